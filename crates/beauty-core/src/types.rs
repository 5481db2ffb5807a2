//! # Domain Types
//!
//! Core domain types used throughout Beauty Shop Manager.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name, category │   │  product_name ❄ │   │  name, email    │       │
//! │  │  prices (cents) │   │  unit_price   ❄ │   │  role           │       │
//! │  │  stock_qty      │   │  employee     ❄ │   └────────┬────────┘       │
//! │  │  version        │   │  total_cents    │            │                │
//! │  └─────────────────┘   └─────────────────┘   ┌────────▼────────┐       │
//! │                                               │    Session      │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   │  token, user,   │       │
//! │  │ PaymentMethod   │   │      Role       │   │  expires_at     │       │
//! │  │ Cash/Card/Mobile│   │ Admin/Employee  │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ❄ = snapshot copied at the moment of sale                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entities are owned by the persistence layer. Reports, filters and
//! exports only ever borrow slices of them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Stock Status
// =============================================================================

/// Derived stock level classification of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Human label used in the inventory table and exports.
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }

    /// True for anything that should appear in the restock alert.
    pub fn needs_restock(&self) -> bool {
        !matches!(self, StockStatus::InStock)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product on the shop shelves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, also the grouping key in top products.
    pub name: String,

    /// Open category string, see [`crate::PRODUCT_CATEGORIES`].
    pub category: String,

    /// What the shop paid, in cents.
    pub cost_price_cents: i64,

    /// Shelf price in cents. Copied into every sale.
    pub selling_price_cents: i64,

    /// Units on hand. Never negative.
    pub stock_qty: i64,

    /// Per-product low stock level. Falls back to the shop default.
    pub low_stock_threshold: Option<i64>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// Optimistic concurrency token, bumped on every write.
    pub version: i64,
}

impl Product {
    /// Returns the selling price as a Money type.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }

    /// Returns the cost price as a Money type.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// The threshold in force for this product.
    #[inline]
    pub fn effective_threshold(&self, default_threshold: i64) -> i64 {
        self.low_stock_threshold.unwrap_or(default_threshold)
    }

    /// Classifies the current stock level.
    ///
    /// ```text
    /// stock == 0            → OutOfStock
    /// stock <= threshold    → LowStock
    /// otherwise             → InStock
    /// ```
    pub fn stock_status(&self, default_threshold: i64) -> StockStatus {
        if self.stock_qty <= 0 {
            StockStatus::OutOfStock
        } else if self.stock_qty <= self.effective_threshold(default_threshold) {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Checks whether `quantity` units can be sold right now.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity >= 1 && quantity <= self.stock_qty
    }

    /// Applies the set fields of a patch in place.
    ///
    /// Timestamps and version are left to the persistence layer.
    pub fn apply_patch(&mut self, patch: &ProductPatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(category) = &patch.category {
            self.category = category.trim().to_string();
        }
        if let Some(cost) = patch.cost_price_cents {
            self.cost_price_cents = cost;
        }
        if let Some(price) = patch.selling_price_cents {
            self.selling_price_cents = price;
        }
        if let Some(stock) = patch.stock_qty {
            self.stock_qty = stock;
        }
        if let Some(threshold) = patch.low_stock_threshold {
            self.low_stock_threshold = threshold;
        }
    }
}

/// Fields needed to create a product. The store assigns id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub cost_price_cents: i64,
    pub selling_price_cents: i64,
    pub stock_qty: i64,
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
}

/// Partial product update. `None` leaves a field untouched.
///
/// `low_stock_threshold` is doubly optional: `Some(None)` clears the
/// per-product threshold so the shop default applies again.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub cost_price_cents: Option<i64>,
    #[serde(default)]
    pub selling_price_cents: Option<i64>,
    #[serde(default)]
    pub stock_qty: Option<i64>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub low_stock_threshold: Option<Option<i64>>,
}

impl ProductPatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.cost_price_cents.is_none()
            && self.selling_price_cents.is_none()
            && self.stock_qty.is_none()
            && self.low_stock_threshold.is_none()
    }
}

/// Maps a present JSON field (value or `null`) to `Some(..)`; an absent
/// field stays `None` through `#[serde(default)]`.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid. Closed set.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Mobile,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Mobile,
    ];

    /// Stored and exported form.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Mobile => "mobile",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "mobile" => Ok(PaymentMethod::Mobile),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: PaymentMethod::ALL.iter().map(|m| m.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale of one product.
///
/// Product name, unit price and employee are frozen at the moment of sale,
/// so later edits or deletions of the product do not rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Always >= 1.
    pub quantity: i64,
    /// Selling price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// unit_price_cents × quantity.
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub employee_id: String,
    /// Employee name at time of sale (frozen).
    pub employee_name: String,
    /// Transaction date used by reports and filters.
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Role
// =============================================================================

/// Account role. Closed set.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["admin".to_string(), "employee".to_string()],
            }),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A staff profile. Credentials never leave the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Login identifier, unique ignoring case.
    pub email: String,
    pub role: Role,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl User {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Fields needed to create a user account.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Plaintext, hashed before it reaches the store.
    pub password: String,
}

/// Partial user update. A `password` replaces the stored hash.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub password: Option<String>,
}

// =============================================================================
// Session
// =============================================================================

/// An authenticated session. Passed explicitly to every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Session {
    /// Opaque bearer token (UUID v4).
    pub token: String,
    /// Profile snapshot taken at login.
    pub user: User,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub expires_at: DateTime<Utc>,
}

impl Session {
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.user.role
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn product(stock: i64, threshold: Option<i64>) -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            name: "Hydrating Face Serum".to_string(),
            category: "Skincare".to_string(),
            cost_price_cents: 1200,
            selling_price_cents: 2999,
            stock_qty: stock,
            low_stock_threshold: threshold,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    #[test]
    fn test_stock_status() {
        assert_eq!(product(0, None).stock_status(5), StockStatus::OutOfStock);
        assert_eq!(product(5, None).stock_status(5), StockStatus::LowStock);
        assert_eq!(product(6, None).stock_status(5), StockStatus::InStock);
        assert_eq!(product(8, Some(10)).stock_status(5), StockStatus::LowStock);
        assert_eq!(product(3, Some(2)).stock_status(5), StockStatus::InStock);
    }

    #[test]
    fn test_stock_status_labels() {
        assert_eq!(StockStatus::OutOfStock.label(), "Out of Stock");
        assert!(StockStatus::LowStock.needs_restock());
        assert!(!StockStatus::InStock.needs_restock());
    }

    #[test]
    fn test_can_sell() {
        let p = product(3, None);
        assert!(p.can_sell(3));
        assert!(!p.can_sell(4));
        assert!(!p.can_sell(0));
    }

    #[test]
    fn test_apply_patch() {
        let mut p = product(3, Some(4));
        p.apply_patch(&ProductPatch {
            name: Some("  Vitamin C Serum ".to_string()),
            stock_qty: Some(12),
            low_stock_threshold: Some(None),
            ..Default::default()
        });
        assert_eq!(p.name, "Vitamin C Serum");
        assert_eq!(p.stock_qty, 12);
        assert_eq!(p.low_stock_threshold, None);
        assert_eq!(p.category, "Skincare");
    }

    #[test]
    fn test_patch_threshold_json() {
        let cleared: ProductPatch = serde_json::from_str(r#"{"low_stock_threshold":null}"#).unwrap();
        assert_eq!(cleared.low_stock_threshold, Some(None));

        let absent: ProductPatch = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert_eq!(absent.low_stock_threshold, None);
        assert!(!absent.is_empty());
        assert!(ProductPatch::default().is_empty());
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("Card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(PaymentMethod::Mobile.to_string(), "mobile");
        assert!("cheque".parse::<PaymentMethod>().is_err());
        assert_eq!(serde_json::to_string(&PaymentMethod::Cash).unwrap(), "\"cash\"");
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let session = Session {
            token: "t".to_string(),
            user: User {
                id: "u".to_string(),
                name: "Sarah Johnson".to_string(),
                email: "sarah@beautyshop.com".to_string(),
                role: Role::Employee,
                created_at: now,
            },
            created_at: now,
            expires_at: now + Duration::hours(12),
        };
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::hours(12)));
        assert_eq!(session.role(), Role::Employee);
    }
}
