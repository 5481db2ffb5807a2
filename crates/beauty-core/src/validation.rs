//! # Validation Module
//!
//! Input validation utilities for Beauty Shop Manager.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard forms (external UI)                                │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Manager command (Rust)                                       │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Field rules                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE email (case-insensitive)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use beauty_core::validation::{validate_email, validate_quantity};
//!
//! assert!(validate_email("sarah@beautyshop.com").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{NewProduct, NewUser, Product, UserPatch};
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS, MAX_STOCK_QTY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Shortest password accepted for a staff account.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use beauty_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Matte Liquid Lipstick").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, 200)
}

/// Validates a product category. Any non-empty label up to 100 characters.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_text("category", category, 100)
}

/// Validates a person's display name.
pub fn validate_person_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, 100)
}

/// Validates an email address used as a login identifier.
///
/// ## Rules
/// - Must not be empty, at most 254 characters
/// - Exactly one `@` with text on both sides
/// - No whitespace
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_text("email", email, 254)?;

    let email = email.trim();
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(invalid("must look like name@example.com")),
    }
}

/// Validates a new password.
///
/// ## Rules
/// - At least [`MIN_PASSWORD_LEN`] characters
/// - At most 128 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    let len = password.chars().count();

    if len < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    if len > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// Empty is allowed and means "no filter". Returns the trimmed query.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale quantity.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  New Sale form                                                          │
/// │                                                                         │
/// │  User enters quantity: 2                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(2) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → stock check in plan_sale                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free samples).
///
/// ```rust
/// use beauty_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("selling_price", 0).is_ok());
/// assert!(validate_price_cents("selling_price", -100).is_err());
/// assert!(validate_price_cents("selling_price", i64::MAX / 2).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    validate_non_negative(field, cents, MAX_PRICE_CENTS)
}

/// Validates a stock level or low-stock threshold.
pub fn validate_stock_qty(field: &str, qty: i64) -> ValidationResult<()> {
    validate_non_negative(field, qty, MAX_STOCK_QTY)
}

/// Stock levels, thresholds and prices share one rule: `0..=max`.
pub fn validate_non_negative(field: &str, value: i64, max: i64) -> ValidationResult<()> {
    match value {
        v if v < 0 => Err(ValidationError::Negative {
            field: field.to_string(),
        }),
        v if v > max => Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates every field of a product creation request.
pub fn validate_new_product(new: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&new.name)?;
    validate_category(&new.category)?;
    validate_price_cents("cost_price", new.cost_price_cents)?;
    validate_price_cents("selling_price", new.selling_price_cents)?;
    validate_stock_qty("stock_qty", new.stock_qty)?;
    if let Some(threshold) = new.low_stock_threshold {
        validate_stock_qty("low_stock_threshold", threshold)?;
    }
    Ok(())
}

/// Validates a product after a patch was applied to it.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_category(&product.category)?;
    validate_price_cents("cost_price", product.cost_price_cents)?;
    validate_price_cents("selling_price", product.selling_price_cents)?;
    validate_stock_qty("stock_qty", product.stock_qty)?;
    if let Some(threshold) = product.low_stock_threshold {
        validate_stock_qty("low_stock_threshold", threshold)?;
    }
    Ok(())
}

/// Validates a user creation request.
pub fn validate_new_user(new: &NewUser) -> ValidationResult<()> {
    validate_person_name(&new.name)?;
    validate_email(&new.email)?;
    validate_password(&new.password)
}

/// Validates the fields a user patch sets.
pub fn validate_user_patch(patch: &UserPatch) -> ValidationResult<()> {
    if let Some(name) = &patch.name {
        validate_person_name(name)?;
    }
    if let Some(email) = &patch.email {
        validate_email(email)?;
    }
    if let Some(password) = &patch.password {
        validate_password(password)?;
    }
    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use beauty_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
