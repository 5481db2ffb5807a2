//! # Manager Commands Module
//!
//! Every operation the dashboard screens call.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── auth.rs     ◄─── login, logout, current_user
//! ├── product.rs  ◄─── Inventory list, CRUD, summary
//! ├── sale.rs     ◄─── record_sale, list, void
//! ├── report.rs   ◄─── Sales report, dashboard
//! ├── user.rs     ◄─── Staff accounts (admin only)
//! ├── export.rs   ◄─── CSV files
//! └── config.rs   ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(&db, &config, &session, request)                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  session::require(db, session, Action::RecordSale)                      │
//! │         │  ◄── fails with SessionExpired / Forbidden before any I/O     │
//! │         ▼                                                               │
//! │  beauty-core (plan, filter, report)  +  beauty-db (read, write)         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Result<Dto, ApiError>  (camelCase JSON)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs database
//! async fn get_product(db: &DbState, session: &Session, id: &str)
//!
//! // Needs thresholds and the shop's UTC offset too
//! async fn list_products(db: &DbState, config: &ManagerConfig, session: &Session, ...)
//! ```

pub mod auth;
pub mod config;
pub mod export;
pub mod product;
pub mod report;
pub mod sale;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::state::{DbState, ManagerConfig};
    use beauty_core::Session;
    use beauty_db::{seed_demo_data, Database, DbConfig};

    /// In-memory store with the demo profiles and products.
    pub async fn demo_state() -> (DbState, ManagerConfig) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_demo_data(&db).await.unwrap();
        (DbState::new(db), ManagerConfig::default())
    }

    pub async fn login_admin(db: &DbState, config: &ManagerConfig) -> Session {
        super::auth::login(db, config, "admin@beautyshop.com", "admin123")
            .await
            .unwrap()
    }

    pub async fn login_employee(db: &DbState, config: &ManagerConfig) -> Session {
        super::auth::login(db, config, "sarah@beautyshop.com", "emp123")
            .await
            .unwrap()
    }
}
