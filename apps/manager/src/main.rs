//! # Beauty Shop Manager Entry Point
//!
//! Opens the store, seeds it on first run and prints a status overview.
//! With credentials it also signs in, shows today's dashboard numbers and
//! can write both CSV exports.
//!
//! ## Usage
//! ```bash
//! # Open (and seed) the default store, print the restock alert
//! beauty-manager
//!
//! # Sign in, show the dashboard, export sales and inventory
//! beauty-manager --email admin@beautyshop.com --password admin123 --export ./exports
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (`BEAUTY_*` environment, then flags)
//! 3. Connect to database, run migrations, seed demo data
//! 4. Optionally sign in and run the dashboard and export commands

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;

use beauty_core::filter::SaleFilter;
use beauty_core::report::inventory_summary;
use beauty_manager::commands::{auth, export, report};
use beauty_manager::state::ManagerConfig;

#[derive(Debug, Default)]
struct Args {
    db: Option<PathBuf>,
    email: Option<String>,
    password: Option<String>,
    export_dir: Option<PathBuf>,
    help: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--db" | "-d" => args.db = Some(iter.next().context("--db needs a path")?.into()),
            "--email" | "-e" => args.email = Some(iter.next().context("--email needs a value")?),
            "--password" | "-p" => {
                args.password = Some(iter.next().context("--password needs a value")?)
            }
            "--export" | "-x" => {
                args.export_dir = Some(iter.next().context("--export needs a directory")?.into())
            }
            "--help" | "-h" => args.help = true,
            other => bail!("Unknown argument: {other}"),
        }
    }

    Ok(args)
}

fn print_help() {
    println!("Beauty Shop Manager");
    println!();
    println!("Usage: beauty-manager [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>          Database file path (or set BEAUTY_DB_PATH)");
    println!("  -e, --email <EMAIL>      Sign in as this user");
    println!("  -p, --password <PASS>    Password for --email");
    println!("  -x, --export <DIR>       Write sales and inventory CSVs (needs sign in)");
    println!("  -h, --help               Show this help message");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;
    if args.help {
        print_help();
        return Ok(());
    }

    beauty_manager::init_tracing();
    info!("Starting Beauty Shop Manager");

    let mut config = ManagerConfig::from_env();
    if args.db.is_some() {
        config.db_path = args.db;
    }

    let app = beauty_manager::init(config).await?;
    let (db, config) = (&app.db, &app.config);

    let products = db.inner().products().list().await?;
    let stock = inventory_summary(&products, config.low_stock_threshold);
    info!(
        store = %config.store_name,
        products = stock.total_products,
        low = stock.low_stock,
        out = stock.out_of_stock,
        "Inventory status"
    );
    if !stock.restock_names.is_empty() {
        println!("Restock needed: {}", stock.restock_names.join(", "));
    }

    let (Some(email), Some(password)) = (args.email, args.password) else {
        if args.export_dir.is_some() {
            bail!("--export needs --email and --password");
        }
        db.inner().close().await;
        return Ok(());
    };

    let session = auth::login(db, config, &email, &password).await?;
    println!("Signed in as {} ({})", session.user.name, session.role());

    let today = report::dashboard(db, config, &session).await?;
    println!(
        "Today: {} sales, {} revenue, {} of {} products need restocking",
        today.today_sales,
        config.format_currency(today.today_revenue.cents()),
        today.low_stock_count,
        today.total_products
    );

    if let Some(dir) = args.export_dir {
        for outcome in [
            export::export_sales(db, config, &session, &dir, &SaleFilter::default()).await?,
            export::export_inventory(db, config, &session, &dir).await?,
        ] {
            match outcome.path {
                Some(path) => println!("Wrote {} rows to {}", outcome.rows, path.display()),
                None => println!("Nothing to export"),
            }
        }
    }

    auth::logout(db, &session).await?;
    db.inner().close().await;
    Ok(())
}
