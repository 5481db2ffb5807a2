//! # beauty-core: Pure Business Logic for Beauty Shop Manager
//!
//! This crate holds every business rule of the shop backend as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Beauty Shop Manager Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Dashboard screens (external UI)                    │   │
//! │  │   Inventory ──► Sales ──► Reports ──► Users ──► Export          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ command calls                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/manager commands                        │   │
//! │  │    login, record_sale, sales_report, export_sales, etc.         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ beauty-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐   │   │
//! │  │  │  types  │ │  sales  │ │ report  │ │ export  │ │ policy  │   │   │
//! │  │  │ Product │ │plan_sale│ │ totals  │ │  CSV    │ │  roles  │   │   │
//! │  │  │  Sale   │ │         │ │ top-N   │ │  rows   │ │ actions │   │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   beauty-db (Database Layer)                    │   │
//! │  │          SQLite queries, migrations, repositories, seed         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, User, Session)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level validation rules
//! - [`sales`] - Sale planning against current stock
//! - [`report`] - Sales reports, inventory and dashboard summaries
//! - [`export`] - Delimited text export
//! - [`policy`] - Role based access checks
//! - [`filter`] - Inventory and sales list filters
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: "now" and "today" are always parameters
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use beauty_core::money::Money;
//! use beauty_core::report::build_report;
//!
//! let price = Money::from_cents(1099); // $10.99
//! assert_eq!((price * 2i64).cents(), 2198);
//!
//! let report = build_report(&[], None);
//! assert!(report.total_revenue.is_zero());
//! assert!(report.top_products.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod export;
pub mod filter;
pub mod money;
pub mod policy;
pub mod report;
pub mod sales;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use beauty_core::Money` instead of
// `use beauty_core::money::Money`

pub use error::{CoreError, CoreResult, ExportError, ValidationError};
pub use money::Money;
pub use policy::{authorize, Action};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of entries kept in a report's top products list.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Stock level at or below which a product counts as low stock when it
/// carries no threshold of its own.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Maximum units in a single sale.
///
/// Stops a mistyped quantity (1000 instead of 10) at the form.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum price of one unit, in cents ($1,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Maximum stock level or low-stock threshold of one product.
pub const MAX_STOCK_QTY: i64 = 1_000_000;

/// Suggested product categories offered by the inventory form.
///
/// The category column is an open string; this list only seeds pickers.
pub const PRODUCT_CATEGORIES: [&str; 8] = [
    "Skincare",
    "Makeup",
    "Haircare",
    "Fragrance",
    "Tools & Accessories",
    "Nail Care",
    "Body Care",
    "Other",
];
