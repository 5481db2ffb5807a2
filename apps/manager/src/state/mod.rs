//! # State Module
//!
//! State handed to the manager commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────────────┐  │
//! │  │   DbState    │  │  ManagerConfig   │  │  Session (per caller)    │  │
//! │  │              │  │                  │  │                          │  │
//! │  │  Database    │  │  thresholds      │  │  token, user snapshot    │  │
//! │  │  (SQLite     │  │  session TTL     │  │  resolved by             │  │
//! │  │   pool)      │  │  UTC offset      │  │  session::require        │  │
//! │  └──────────────┘  └──────────────────┘  └──────────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                         │
//! │  • DbState: Database has internal connection pool (thread-safe)         │
//! │  • ManagerConfig: Read-only after initialization                        │
//! │  • Session: Plain value passed explicitly, no process-wide user         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
pub mod session;

pub use config::ManagerConfig;
pub use db::DbState;
