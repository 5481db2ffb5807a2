//! # Beauty Shop Manager Library
//!
//! Application layer for the Beauty Shop Manager dashboard.
//! Opens the store, seeds it on first run and exposes every command the
//! dashboard screens call.
//!
//! ## Module Organization
//! ```text
//! beauty_manager/
//! ├── lib.rs          ◄─── You are here (startup & logging)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── session.rs  ◄─── Session check before every command
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── auth.rs     ◄─── login / logout
//! │   ├── product.rs  ◄─── Inventory commands
//! │   ├── sale.rs     ◄─── Recording and voiding sales
//! │   ├── report.rs   ◄─── Reports and dashboard numbers
//! │   ├── user.rs     ◄─── Staff accounts
//! │   ├── export.rs   ◄─── CSV files
//! │   └── config.rs   ◄─── Configuration retrieval
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management (Multiple State Types)
//! Instead of a single `AppState` struct, commands take focused state types:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Manager State                                        │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────────────────┐  │
//! │  │    DbState           │        │    ManagerConfig                 │  │
//! │  │                      │        │                                  │  │
//! │  │  • Database pool     │        │  • Store name, currency          │  │
//! │  │  • Repositories      │        │  • Low stock threshold           │  │
//! │  │                      │        │  • Session TTL, UTC offset       │  │
//! │  └──────────────────────┘        └──────────────────────────────────┘  │
//! │                                                                         │
//! │  Each command only requests the state it needs.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use beauty_db::{seed_demo_data, Database, DbConfig, DbError, DbResult};
use state::{DbState, ManagerConfig};

/// Everything a running manager holds.
#[derive(Debug, Clone)]
pub struct App {
    pub db: DbState,
    pub config: ManagerConfig,
}

/// Opens the store described by `config`.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Determine Database Path ──────────────────────────────────────────► │
/// │     • BEAUTY_DB_PATH / --db, else the platform data directory           │
/// │     • ":memory:" opens a throwaway store                                │
/// │                                                                         │
/// │  2. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  3. Seed Demo Data (if enabled) ──────────────────────────────────────► │
/// │     • Only into empty tables                                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn init(config: ManagerConfig) -> DbResult<App> {
    let path = config
        .database_path()
        .ok_or_else(|| DbError::ConnectionFailed("Could not determine app data directory".into()))?;
    info!(db_path = %path.display(), store = %config.store_name, "Opening store");

    let db_config = DbConfig::new(path);
    if !db_config.is_in_memory() {
        let parent = db_config.database_path.parent();
        if let Some(parent) = parent.filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DbError::ConnectionFailed(format!("Could not create {}: {}", parent.display(), e))
            })?;
        }
    }

    let db = Database::new(db_config).await?;

    if config.seed_demo_data {
        let report = seed_demo_data(&db).await?;
        if !report.is_empty() {
            info!(users = report.users, products = report.products, "Demo data seeded");
        }
    }

    info!("Store ready");
    Ok(App {
        db: DbState::new(db),
        config,
    })
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=beauty=trace` - Show trace for beauty crates only
/// - Default: INFO, debug for beauty crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,beauty=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_init_in_memory_seeds() {
        let config = ManagerConfig {
            db_path: Some(PathBuf::from(":memory:")),
            ..Default::default()
        };
        let app = init(config).await.unwrap();

        assert_eq!(app.db.inner().users().count().await.unwrap(), 2);
        assert_eq!(app.db.inner().products().count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_init_without_seed() {
        let config = ManagerConfig {
            db_path: Some(PathBuf::from(":memory:")),
            seed_demo_data: false,
            ..Default::default()
        };
        let app = init(config).await.unwrap();
        assert_eq!(app.db.inner().users().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reopen_does_not_reseed() {
        let dir = std::env::temp_dir().join(format!("beauty-init-{}", uuid::Uuid::new_v4()));
        let config = ManagerConfig {
            db_path: Some(dir.join("nested").join("shop.db")),
            ..Default::default()
        };

        let first = init(config.clone()).await.unwrap();
        first.db.inner().close().await;

        let second = init(config).await.unwrap();
        assert_eq!(second.db.inner().products().count().await.unwrap(), 5);
        second.db.inner().close().await;

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
