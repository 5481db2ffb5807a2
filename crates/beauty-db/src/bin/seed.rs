//! # Seed Data Generator
//!
//! Populates a store with the demo profiles and products.
//!
//! ## Usage
//! ```bash
//! # Seed ./beauty_dev.db (default)
//! cargo run -p beauty-db --bin seed
//!
//! # Specify database path
//! cargo run -p beauty-db --bin seed -- --db ./data/beauty.db
//! ```
//!
//! Tables that already hold records are left alone.

use beauty_db::seed::{
    DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, DEMO_EMPLOYEE_EMAIL, DEMO_EMPLOYEE_PASSWORD,
};
use beauty_db::{seed_demo_data, Database, DbConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./beauty_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Beauty Shop Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./beauty_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Beauty Shop Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let start = std::time::Instant::now();
    let report = seed_demo_data(&db).await?;

    println!();
    if report.is_empty() {
        println!("⚠ Database already has profiles and products");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
    } else {
        println!(
            "✓ Seeded {} profiles and {} products in {:?}",
            report.users,
            report.products,
            start.elapsed()
        );
    }

    if report.users > 0 {
        println!();
        println!("Demo logins:");
        println!("  admin     {} / {}", DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD);
        println!("  employee  {} / {}", DEMO_EMPLOYEE_EMAIL, DEMO_EMPLOYEE_PASSWORD);
    }

    let products = db.products().list().await?;
    println!();
    println!("Products in store: {}", products.len());
    for product in &products {
        println!(
            "  {:<24} {:<10} {:>8}  stock {}",
            product.name,
            product.category,
            product.selling_price().to_string(),
            product.stock_qty
        );
    }

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
