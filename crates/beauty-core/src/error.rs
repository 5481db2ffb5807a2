//! # Domain Errors
//!
//! ```text
//! ValidationError ──(#[from])──► CoreError ──► ApiError (manager)
//!   field rules                   sale, auth and account rules
//!
//! ExportError ──────────────────────────────► ApiError (manager)
//!   CSV writer failures
//! ```
//!
//! Messages are written for the person at the counter. The manager passes
//! them through unchanged.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Checked before any write. The shelf is left as it was.
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Stock kept changing under a sale until the retry budget ran out.
    #[error("Stock for {product} changed during the sale, please try again")]
    StockConflict { product: String },

    /// The signed-in role may not perform the action.
    #[error("Not allowed to {action}")]
    Forbidden { action: String },

    /// Unknown email or wrong password. One message for both.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Session token is unknown or past its expiry.
    #[error("Session expired, please sign in again")]
    SessionExpired,

    /// The change would leave the shop without an administrator.
    #[error("At least one admin account must remain")]
    LastAdmin,

    /// Admins may not delete the account they are signed in with.
    #[error("You cannot delete your own account")]
    SelfDeletion,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single field failed its rule. `field` is the form field name.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Quantities start at one.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Prices, stock and thresholds may be zero but not below.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Malformed email or id, or a date range that ends before it starts.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Export Error
// =============================================================================

/// Failures while rendering rows as delimited text.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV writer failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Could not flush export buffer: {0}")]
    Buffer(String),

    #[error("Export produced invalid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
