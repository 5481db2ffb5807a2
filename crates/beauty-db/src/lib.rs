//! # beauty-db: Database Layer for Beauty Shop Manager
//!
//! This crate provides database access for the Beauty Shop Manager.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Beauty Shop Manager Data Flow                       │
//! │                                                                         │
//! │  Manager command (record_sale)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     beauty-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │   │   │
//! │  │   │               │    │ ProductRepo   │    │              │   │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepo      │    │ 001_initial_ │   │   │
//! │  │   │ Connection    │    │ UserRepo      │    │  schema.sql  │   │   │
//! │  │   │ Management    │    │ SessionRepo   │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   password (argon2)   seed (demo data)   snapshot (JSON)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (platform data dir)/beauty-shop.db                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, sale, user, session)
//! - [`password`] - Password hashing
//! - [`seed`] - First-run demo data
//! - [`snapshot`] - Whole-store JSON backup and restore
//!
//! ## Usage
//!
//! ```rust,ignore
//! use beauty_db::{seed_demo_data, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/beauty.db")).await?;
//! seed_demo_data(&db).await?;
//!
//! let products = db.products().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod password;
pub mod pool;
pub mod repository;
pub mod seed;
pub mod snapshot;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use seed::{seed_demo_data, SeedReport};
pub use snapshot::{export_snapshot, import_snapshot, Snapshot};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::session::SessionRepository;
pub use repository::user::{Credentials, UserRepository};
