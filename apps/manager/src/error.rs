//! # API Error Type
//!
//! Unified error type for manager commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Beauty Shop Manager                    │
//! │                                                                         │
//! │  Dashboard                   Rust Backend                               │
//! │  ─────────                   ────────────                               │
//! │                                                                         │
//! │  record_sale(session, ...)                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Database Error? ─── DbError::QueryFailed("...") ──┐             │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Business Error? ─── CoreError::InsufficientStock ─ ApiError ───►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "INSUFFICIENT_STOCK",                                        │
//! │    "message": "Insufficient stock for Gel Nail Polish: ..." }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage failures are logged in full and surfaced with a generic message.

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use beauty_core::{CoreError, ExportError, ValidationError};
use beauty_db::DbError;

/// API error returned from manager commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 6f1c..."
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Database operation failed (500)
    DatabaseError,

    /// Business rule rejected the change (422)
    BusinessLogic,

    /// Internal server error (500)
    Internal,

    /// Not enough units on the shelf
    InsufficientStock,

    /// No session, expired session or wrong credentials (401)
    Unauthorized,

    /// Signed in, but the role may not do this (403)
    Forbidden,

    /// Concurrent writes kept colliding (409)
    Conflict,

    /// Export file could not be produced
    ExportError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Constraint and concurrency failures keep their meaning. Storage
/// failures are logged in full and reach the dashboard as one generic line.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{} '{}' is already in use", field, value))
            }
            DbError::StaleWrite { entity, id } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} {} was changed by someone else, reload and retry", entity, id),
            ),
            DbError::Snapshot(message) => ApiError::new(ErrorCode::BusinessLogic, message),
            DbError::PasswordHash(e) => {
                error!(error = %e, "Password hashing failed");
                ApiError::internal("Could not process password")
            }
            DbError::ForeignKeyViolation { message } => {
                error!(%message, "Foreign key violation");
                ApiError::validation("Invalid reference")
            }
            storage => {
                error!(error = %storage, "Storage failure");
                let message = match storage {
                    DbError::ConnectionFailed(_) | DbError::PoolExhausted => "Store unavailable",
                    DbError::MigrationFailed(_) => "Store schema could not be updated",
                    _ => "Database operation failed",
                };
                ApiError::new(ErrorCode::DatabaseError, message)
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, message)
            }
            CoreError::StockConflict { .. } => ApiError::new(ErrorCode::Conflict, message),
            CoreError::Forbidden { .. } => ApiError::new(ErrorCode::Forbidden, message),
            CoreError::InvalidCredentials | CoreError::SessionExpired => {
                ApiError::new(ErrorCode::Unauthorized, message)
            }
            CoreError::LastAdmin | CoreError::SelfDeletion => {
                ApiError::new(ErrorCode::BusinessLogic, message)
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts field validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts export formatting errors to API errors.
impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        error!("Export formatting failed: {}", err);
        ApiError::new(ErrorCode::ExportError, format!("Export failed: {}", err))
    }
}

/// Converts file system errors (export target) to API errors.
impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        error!("Export file write failed: {}", err);
        ApiError::new(ErrorCode::ExportError, format!("Could not write export file: {}", err))
    }
}
