//! # Sale Repository
//!
//! Database operations for sales.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Sale Lifecycle                                  │
//! │                                                                         │
//! │   plan_sale (core)                                                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   record(sale, expected_version)          ONE TRANSACTION               │
//! │   ┌──────────────────────────────────────────────────────────────┐     │
//! │   │ UPDATE products SET stock_qty = stock_qty - qty,             │     │
//! │   │                     version = version + 1                    │     │
//! │   │  WHERE id = ? AND version = ? AND stock_qty >= qty           │     │
//! │   │        │                                                     │     │
//! │   │        ├── 0 rows → ROLLBACK → StaleWrite                    │     │
//! │   │        ▼                                                     │     │
//! │   │ INSERT INTO sales ...                                        │     │
//! │   └──────────────────────────────────────────────────────────────┘     │
//! │        │ COMMIT                                                         │
//! │        ▼                                                                │
//! │   delete(id)  (admin void)                ONE TRANSACTION               │
//! │   DELETE sale + give the quantity back to the product if it exists      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use beauty_core::report::DateRange;
use beauty_core::Sale;

pub(crate) const SALE_COLUMNS: &str = "id, product_id, product_name, quantity, unit_price_cents, \
     total_cents, payment_method, employee_id, employee_name, sold_at, created_at";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists all sales, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales ORDER BY sold_at DESC, created_at DESC");
        let sales = sqlx::query_as::<_, Sale>(&sql).fetch_all(&self.pool).await?;

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }

    /// Lists sales whose local calendar date falls inside `range`, newest first.
    pub async fn list_between(&self, range: &DateRange) -> DbResult<Vec<Sale>> {
        let (from, until) = range.utc_bounds();
        debug!(start = %range.start, end = %range.end, "Listing sales in range");

        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE sold_at >= ? AND sold_at < ? \
             ORDER BY sold_at DESC, created_at DESC"
        );
        let mut sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(from)
            .bind(until)
            .fetch_all(&self.pool)
            .await?;

        // Text comparison in SQL narrows the scan; the calendar check is exact
        sales.retain(|s| range.contains(s.sold_at));
        Ok(sales)
    }

    /// Gets a sale by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        fetch_sale(&self.pool, id).await
    }

    /// Counts sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Stores a planned sale and decrements the product's stock atomically.
    ///
    /// `expected_version` is the product version the sale was planned
    /// against. If the product changed since, nothing is written.
    ///
    /// ## Errors
    /// * `StaleWrite` - version moved, stock too low, or product gone
    pub async fn record(&self, sale: &Sale, expected_version: i64) -> DbResult<Sale> {
        debug!(
            product_id = %sale.product_id,
            quantity = sale.quantity,
            expected_version,
            "Recording sale"
        );

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                stock_qty = stock_qty - ?,
                updated_at = ?,
                version = version + 1
            WHERE id = ? AND version = ? AND stock_qty >= ?
            "#,
        )
        .bind(sale.quantity)
        .bind(Utc::now())
        .bind(&sale.product_id)
        .bind(expected_version)
        .bind(sale.quantity)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            debug!(product_id = %sale.product_id, "Stock changed under sale, rolled back");
            return Err(DbError::stale("Product", &sale.product_id));
        }

        insert_sale_row(&mut *tx, sale).await?;
        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            product = %sale.product_name,
            quantity = sale.quantity,
            total_cents = sale.total_cents,
            "Sale recorded"
        );
        Ok(sale.clone())
    }

    /// Deletes a sale and puts its quantity back on the shelf.
    ///
    /// When the product has been deleted since, only the sale is removed.
    /// Returns the removed sale.
    pub async fn delete(&self, id: &str) -> DbResult<Sale> {
        debug!(id = %id, "Deleting sale");

        let mut tx = self.pool.begin().await?;

        let sale = fetch_sale(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;

        sqlx::query("DELETE FROM sales WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let restocked = sqlx::query(
            r#"
            UPDATE products SET
                stock_qty = stock_qty + ?,
                updated_at = ?,
                version = version + 1
            WHERE id = ?
            "#,
        )
        .bind(sale.quantity)
        .bind(Utc::now())
        .bind(&sale.product_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        info!(sale_id = %id, restocked = restocked > 0, "Sale deleted");
        Ok(sale)
    }
}

// =============================================================================
// Shared Row Helpers
// =============================================================================

pub(crate) async fn fetch_sale<'e, E>(executor: E, id: &str) -> DbResult<Option<Sale>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?");
    let sale = sqlx::query_as::<_, Sale>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(sale)
}

pub(crate) async fn insert_sale_row<'e, E>(executor: E, sale: &Sale) -> DbResult<()>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("INSERT INTO sales ({SALE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)");
    sqlx::query(&sql)
        .bind(&sale.id)
        .bind(&sale.product_id)
        .bind(&sale.product_name)
        .bind(sale.quantity)
        .bind(sale.unit_price_cents)
        .bind(sale.total_cents)
        .bind(sale.payment_method)
        .bind(&sale.employee_id)
        .bind(&sale.employee_name)
        .bind(sale.sold_at)
        .bind(sale.created_at)
        .execute(executor)
        .await?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use beauty_core::sales::plan_sale;
    use beauty_core::{NewProduct, PaymentMethod, Product, Role, User};
    use chrono::{NaiveDate, TimeZone};

    async fn setup(stock: i64) -> (Database, Product, User) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .insert(&NewProduct {
                name: "Product A".to_string(),
                category: "Makeup".to_string(),
                cost_price_cents: 400,
                selling_price_cents: 1000,
                stock_qty: stock,
                low_stock_threshold: None,
            })
            .await
            .unwrap();
        let employee = User {
            id: "emp-1".to_string(),
            name: "Sarah Johnson".to_string(),
            email: "sarah@beautyshop.com".to_string(),
            role: Role::Employee,
            created_at: Utc::now(),
        };
        (db, product, employee)
    }

    #[tokio::test]
    async fn test_record_decrements_stock() {
        let (db, product, employee) = setup(3).await;
        let sale = plan_sale(&product, 2, PaymentMethod::Cash, &employee, Utc::now()).unwrap();

        db.sales().record(&sale, product.version).await.unwrap();

        let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock_qty, 1);
        assert_eq!(after.version, product.version + 1);
        assert_eq!(db.sales().get_by_id(&sale.id).await.unwrap(), Some(sale));
    }

    #[tokio::test]
    async fn test_stale_version_rolls_back() {
        let (db, product, employee) = setup(3).await;
        let first = plan_sale(&product, 1, PaymentMethod::Cash, &employee, Utc::now()).unwrap();
        let second = plan_sale(&product, 1, PaymentMethod::Card, &employee, Utc::now()).unwrap();

        db.sales().record(&first, product.version).await.unwrap();
        let err = db.sales().record(&second, product.version).await.unwrap_err();

        assert!(matches!(err, DbError::StaleWrite { .. }));
        assert!(db.sales().get_by_id(&second.id).await.unwrap().is_none());
        let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock_qty, 2);
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_cas_refuses_to_go_negative() {
        let (db, mut product, employee) = setup(1).await;
        // Plan against a stale, rosier stock figure
        product.stock_qty = 5;
        let sale = plan_sale(&product, 4, PaymentMethod::Cash, &employee, Utc::now()).unwrap();

        let err = db.sales().record(&sale, product.version).await.unwrap_err();
        assert!(matches!(err, DbError::StaleWrite { .. }));
        let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock_qty, 1);
    }

    #[tokio::test]
    async fn test_delete_restores_stock() {
        let (db, product, employee) = setup(3).await;
        let sale = plan_sale(&product, 2, PaymentMethod::Mobile, &employee, Utc::now()).unwrap();
        db.sales().record(&sale, product.version).await.unwrap();

        let removed = db.sales().delete(&sale.id).await.unwrap();
        assert_eq!(removed.id, sale.id);

        let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock_qty, 3);
        assert!(db.sales().get_by_id(&sale.id).await.unwrap().is_none());

        let err = db.sales().delete(&sale.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_after_product_removed() {
        let (db, product, employee) = setup(3).await;
        let sale = plan_sale(&product, 1, PaymentMethod::Cash, &employee, Utc::now()).unwrap();
        db.sales().record(&sale, product.version).await.unwrap();
        db.products().delete(&product.id).await.unwrap();

        assert!(db.sales().delete(&sale.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_newest_first_and_between() {
        let (db, product, employee) = setup(10).await;
        let mut version = product.version;
        for day in [10, 15, 12] {
            let when = Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap();
            let current = db.products().get_by_id(&product.id).await.unwrap().unwrap();
            let sale = plan_sale(&current, 1, PaymentMethod::Cash, &employee, when).unwrap();
            db.sales().record(&sale, version).await.unwrap();
            version += 1;
        }

        let days: Vec<u32> = db
            .sales()
            .list()
            .await
            .unwrap()
            .iter()
            .map(|s| chrono::Datelike::day(&s.sold_at))
            .collect();
        assert_eq!(days, vec![15, 12, 10]);

        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 5, 11).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
            0,
        )
        .unwrap();
        assert_eq!(db.sales().list_between(&range).await.unwrap().len(), 2);
    }
}
