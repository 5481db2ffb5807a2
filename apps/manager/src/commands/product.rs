//! # Product Commands
//!
//! Inventory screen: list, filter, create, edit, delete.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update_product(session, id, patch)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  require(ManageProducts)          ← employees stop here                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load product, apply patch to a copy, validate_product(copy)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  products.update(id, patch)       ← versioned write, bumps version      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductDto { stockStatus, effectiveThreshold, ... }                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::session::require;
use crate::state::{DbState, ManagerConfig};
use beauty_core::filter::{categories, ProductFilter};
use beauty_core::report::{inventory_summary, InventorySummary};
use beauty_core::validation::{
    validate_new_product, validate_product, validate_search_query, validate_uuid,
};
use beauty_core::{Action, NewProduct, Product, ProductPatch, Session, StockStatus};

/// Product DTO for the dashboard, with its derived stock status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub category: String,
    pub cost_price_cents: i64,
    pub selling_price_cents: i64,
    pub stock_qty: i64,
    /// The product's own threshold, if set.
    pub low_stock_threshold: Option<i64>,
    /// Own threshold or the configured default.
    pub effective_threshold: i64,
    pub stock_status: StockStatus,
    pub version: i64,
    pub updated_at: String,
}

impl ProductDto {
    pub fn from_product(p: Product, default_threshold: i64) -> Self {
        ProductDto {
            effective_threshold: p.effective_threshold(default_threshold),
            stock_status: p.stock_status(default_threshold),
            updated_at: p.updated_at.to_rfc3339(),
            id: p.id,
            name: p.name,
            category: p.category,
            cost_price_cents: p.cost_price_cents,
            selling_price_cents: p.selling_price_cents,
            stock_qty: p.stock_qty,
            low_stock_threshold: p.low_stock_threshold,
            version: p.version,
        }
    }
}

/// Lists products ordered by name, narrowed by the inventory filter.
pub async fn list_products(
    db: &DbState,
    config: &ManagerConfig,
    session: &Session,
    filter: &ProductFilter,
) -> Result<Vec<ProductDto>, ApiError> {
    require(db, session, Action::ViewInventory).await?;
    let mut filter = filter.clone();
    filter.search = validate_search_query(&filter.search)?;
    debug!(search = %filter.search, stock = ?filter.stock, "list_products command");

    let threshold = config.low_stock_threshold;
    let products = db.inner().products().list().await?;

    Ok(filter
        .apply(&products, threshold)
        .into_iter()
        .cloned()
        .map(|p| ProductDto::from_product(p, threshold))
        .collect())
}

/// Gets a single product by its UUID.
pub async fn get_product(
    db: &DbState,
    config: &ManagerConfig,
    session: &Session,
    id: &str,
) -> Result<ProductDto, ApiError> {
    require(db, session, Action::ViewInventory).await?;
    debug!(id = %id, "get_product command");
    validate_uuid(id)?;

    let product = db
        .inner()
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;
    Ok(ProductDto::from_product(product, config.low_stock_threshold))
}

/// Creates a product (admin only).
pub async fn create_product(
    db: &DbState,
    config: &ManagerConfig,
    session: &Session,
    new: &NewProduct,
) -> Result<ProductDto, ApiError> {
    let actor = require(db, session, Action::ManageProducts).await?;
    debug!(name = %new.name, "create_product command");
    validate_new_product(new)?;

    let product = db.inner().products().insert(new).await?;

    info!(id = %product.id, name = %product.name, by = %actor.user.id, "Product created");
    Ok(ProductDto::from_product(product, config.low_stock_threshold))
}

/// Applies a partial update (admin only). An empty patch changes nothing.
pub async fn update_product(
    db: &DbState,
    config: &ManagerConfig,
    session: &Session,
    id: &str,
    patch: &ProductPatch,
) -> Result<ProductDto, ApiError> {
    let actor = require(db, session, Action::ManageProducts).await?;
    debug!(id = %id, "update_product command");
    validate_uuid(id)?;

    let current = db
        .inner()
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    if patch.is_empty() {
        return Ok(ProductDto::from_product(current, config.low_stock_threshold));
    }

    let mut candidate = current;
    candidate.apply_patch(patch);
    validate_product(&candidate)?;

    let product = db.inner().products().update(id, patch).await?;

    info!(id = %product.id, version = product.version, by = %actor.user.id, "Product updated");
    Ok(ProductDto::from_product(product, config.low_stock_threshold))
}

/// Deletes a product (admin only). Its sales stay in history.
pub async fn delete_product(db: &DbState, session: &Session, id: &str) -> Result<(), ApiError> {
    let actor = require(db, session, Action::ManageProducts).await?;
    debug!(id = %id, "delete_product command");
    validate_uuid(id)?;

    db.inner().products().delete(id).await?;

    info!(id = %id, by = %actor.user.id, "Product deleted");
    Ok(())
}

/// Categories in use, first-seen order, for the category dropdown.
pub async fn list_categories(db: &DbState, session: &Session) -> Result<Vec<String>, ApiError> {
    require(db, session, Action::ViewInventory).await?;
    let products = db.inner().products().list().await?;
    Ok(categories(&products))
}

/// Stock level counts and the restock banner.
pub async fn get_inventory_summary(
    db: &DbState,
    config: &ManagerConfig,
    session: &Session,
) -> Result<InventorySummary, ApiError> {
    require(db, session, Action::ViewInventory).await?;
    let products = db.inner().products().list().await?;
    Ok(inventory_summary(&products, config.low_stock_threshold))
}
