//! # Repository Module
//!
//! Database repository implementations for Beauty Shop Manager.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Manager command                                                        │
//! │       │                                                                 │
//! │       │  db.sales().record(&sale, product.version)                      │
//! │       ▼                                                                 │
//! │  SaleRepository                                                         │
//! │  ├── list / list_between(range)                                         │
//! │  ├── record(sale, expected_version)                                     │
//! │  └── delete(id)                                                         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD with versioned writes
//! - [`sale::SaleRepository`] - Sales and the stock they consume
//! - [`user::UserRepository`] - Staff profiles and password hashes
//! - [`session::SessionRepository`] - Login tokens

pub mod product;
pub mod sale;
pub mod session;
pub mod user;
