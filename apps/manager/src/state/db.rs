//! # Database State
//!
//! Wraps the `Database` connection for use in manager commands.
//!
//! ## Thread Safety
//! The `Database` struct from `beauty-db` contains a `SqlitePool` which
//! is inherently thread-safe. Multiple commands can execute queries
//! concurrently without explicit locking.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn list_products(db: &DbState, ...) -> Result<Vec<ProductDto>, ApiError> {
//!     let products = db.inner().products().list().await?;
//!     ...
//! }
//! ```

use beauty_db::Database;

/// Wrapper around `Database` handed to every command.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
