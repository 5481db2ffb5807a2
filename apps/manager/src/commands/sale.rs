//! # Sale Commands
//!
//! Recording sales, the sales table, and voiding a sale.
//!
//! ## Record Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(session, { productId, quantity, paymentMethod })           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  require(RecordSale)                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌── attempt 1..=sale_retry_limit ──────────────────────────────────┐   │
//! │  │  read product (stock, version)                                   │   │
//! │  │  plan_sale ── qty < 1 / qty > stock ──► error, nothing written   │   │
//! │  │  sales.record(sale, version)                                     │   │
//! │  │     ├── Ok          ──► SaleDto                                  │   │
//! │  │     └── StaleWrite  ──► another writer won, read again           │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │       │ budget spent                                                    │
//! │       ▼                                                                 │
//! │  StockConflict                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::session::require;
use crate::state::{DbState, ManagerConfig};
use beauty_core::filter::SaleFilter;
use beauty_core::report::local_date;
use beauty_core::sales::plan_sale;
use beauty_core::validation::{validate_search_query, validate_uuid};
use beauty_core::{Action, CoreError, PaymentMethod, Product, Sale, Session, User};
use beauty_db::{DbError, DbResult};

/// New Sale form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSaleRequest {
    pub product_id: String,
    pub quantity: i64,
    pub payment_method: PaymentMethod,
}

/// Sale DTO for the sales table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub employee_id: String,
    pub employee_name: String,
    pub sold_at: String,
    /// Calendar date in the shop's timezone (YYYY-MM-DD).
    pub local_date: String,
}

impl SaleDto {
    pub fn from_sale(s: Sale, offset: FixedOffset) -> Self {
        SaleDto {
            local_date: local_date(s.sold_at, offset).format("%Y-%m-%d").to_string(),
            sold_at: s.sold_at.to_rfc3339(),
            id: s.id,
            product_id: s.product_id,
            product_name: s.product_name,
            quantity: s.quantity,
            unit_price_cents: s.unit_price_cents,
            total_cents: s.total_cents,
            payment_method: s.payment_method,
            employee_id: s.employee_id,
            employee_name: s.employee_name,
        }
    }
}

/// Records a sale and takes its quantity off the shelf in one transaction.
///
/// The employee on the sale is the session's user. Re-reads and retries
/// when another writer changes the product in between, up to the
/// configured limit.
pub async fn record_sale(
    db: &DbState,
    config: &ManagerConfig,
    session: &Session,
    request: &RecordSaleRequest,
) -> Result<SaleDto, ApiError> {
    let actor = require(db, session, Action::RecordSale).await?;
    debug!(
        product_id = %request.product_id,
        quantity = request.quantity,
        method = %request.payment_method,
        "record_sale command"
    );
    validate_uuid(&request.product_id)?;

    let products = db.inner().products();
    let sale = sell_with_retry(db, config.sale_retry_limit, request, &actor.user, || {
        products.get_by_id(&request.product_id)
    })
    .await?;

    Ok(SaleDto::from_sale(sale, config.offset()))
}

/// The read, plan and record loop behind [`record_sale`].
///
/// `read_product` is called at the start of every attempt. A `StaleWrite`
/// from the store means the version it returned is no longer current.
async fn sell_with_retry<F, Fut>(
    db: &DbState,
    retry_limit: u32,
    request: &RecordSaleRequest,
    employee: &User,
    mut read_product: F,
) -> Result<Sale, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DbResult<Option<Product>>>,
{
    let attempts = retry_limit.max(1);
    let mut product_name = request.product_id.clone();

    for attempt in 1..=attempts {
        let product = read_product()
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(request.product_id.clone()))?;
        product_name = product.name.clone();

        let sale = plan_sale(
            &product,
            request.quantity,
            request.payment_method,
            employee,
            Utc::now(),
        )?;

        match db.inner().sales().record(&sale, product.version).await {
            Ok(sale) => return Ok(sale),
            Err(DbError::StaleWrite { .. }) => {
                warn!(attempt, attempts, product = %product.name, "Stock changed during sale, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }

    warn!(attempts, product = %product_name, "Sale retry budget spent");
    Err(CoreError::StockConflict {
        product: product_name,
    }
    .into())
}

/// Lists sales newest first, narrowed by the sales table filter.
pub async fn list_sales(
    db: &DbState,
    config: &ManagerConfig,
    session: &Session,
    filter: &SaleFilter,
) -> Result<Vec<SaleDto>, ApiError> {
    require(db, session, Action::ViewSales).await?;
    let mut filter = filter.clone();
    filter.search = validate_search_query(&filter.search)?;
    debug!(search = %filter.search, date = ?filter.date, "list_sales command");

    let offset = config.offset();
    let sales = db.inner().sales().list().await?;

    Ok(filter
        .apply(&sales, offset)
        .into_iter()
        .cloned()
        .map(|s| SaleDto::from_sale(s, offset))
        .collect())
}

/// Voids a sale (admin only) and puts its quantity back in stock.
pub async fn delete_sale(
    db: &DbState,
    config: &ManagerConfig,
    session: &Session,
    id: &str,
) -> Result<SaleDto, ApiError> {
    let actor = require(db, session, Action::VoidSale).await?;
    debug!(id = %id, "delete_sale command");
    validate_uuid(id)?;

    let sale = db.inner().sales().delete(id).await?;

    info!(id = %id, quantity = sale.quantity, by = %actor.user.id, "Sale voided");
    Ok(SaleDto::from_sale(sale, config.offset()))
}
