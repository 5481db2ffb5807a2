//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Versioned Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every write to a product row bumps `version`.                          │
//! │                                                                         │
//! │  update(id, patch)                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN ─► SELECT row (version = 4) ─► apply patch in memory             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE ... SET version = version + 1 WHERE id = ? AND version = 4      │
//! │       │                                                                 │
//! │       ├── 1 row  → COMMIT, return product (version = 5)                 │
//! │       └── 0 rows → ROLLBACK, StaleWrite                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock decrement of a sale follows the same rule, see
//! [`crate::repository::sale::SaleRepository::record`].

use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use beauty_core::{NewProduct, Product, ProductPatch};

pub(crate) const PRODUCT_COLUMNS: &str = "id, name, category, cost_price_cents, \
     selling_price_cents, stock_qty, low_stock_threshold, created_at, updated_at, version";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let all = repo.list().await?;
/// let serum = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name COLLATE NOCASE, id");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        fetch_product(&self.pool, id).await
    }

    /// Counts products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Creates a product with a generated id, fresh timestamps and version 1.
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            category: new.category.trim().to_string(),
            cost_price_cents: new.cost_price_cents,
            selling_price_cents: new.selling_price_cents,
            stock_qty: new.stock_qty,
            low_stock_threshold: new.low_stock_threshold,
            created_at: now,
            updated_at: now,
            version: 1,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        insert_product_row(&self.pool, &product).await?;
        Ok(product)
    }

    /// Applies a partial update and bumps the version.
    ///
    /// ## Errors
    /// * `NotFound` - no product with this id
    /// * `StaleWrite` - the row changed between read and write
    pub async fn update(&self, id: &str, patch: &ProductPatch) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let mut tx = self.pool.begin().await?;

        let mut product = fetch_product(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        let read_version = product.version;
        product.apply_patch(patch);
        product.updated_at = Utc::now();
        product.version = read_version + 1;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?,
                category = ?,
                cost_price_cents = ?,
                selling_price_cents = ?,
                stock_qty = ?,
                low_stock_threshold = ?,
                updated_at = ?,
                version = version + 1
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.cost_price_cents)
        .bind(product.selling_price_cents)
        .bind(product.stock_qty)
        .bind(product.low_stock_threshold)
        .bind(product.updated_at)
        .bind(id)
        .bind(read_version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DbError::stale("Product", id));
        }

        tx.commit().await?;
        Ok(product)
    }

    /// Deletes a product. Recorded sales keep their snapshots.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

// =============================================================================
// Shared Row Helpers
// =============================================================================
// Generic over the executor so transactions (sales, snapshot import) can
// reuse them.

pub(crate) async fn fetch_product<'e, E>(executor: E, id: &str) -> DbResult<Option<Product>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(product)
}

/// Inserts a product row exactly as given, id and version included.
pub(crate) async fn insert_product_row<'e, E>(executor: E, product: &Product) -> DbResult<()>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "INSERT INTO products ({PRODUCT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    );
    sqlx::query(&sql)
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.cost_price_cents)
        .bind(product.selling_price_cents)
        .bind(product.stock_qty)
        .bind(product.low_stock_threshold)
        .bind(product.created_at)
        .bind(product.updated_at)
        .bind(product.version)
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn serum() -> NewProduct {
        NewProduct {
            name: "Hydrating Face Serum".to_string(),
            category: "Skincare".to_string(),
            cost_price_cents: 1200,
            selling_price_cents: 2999,
            stock_qty: 24,
            low_stock_threshold: Some(5),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let created = db.products().insert(&serum()).await.unwrap();

        assert_eq!(created.version, 1);
        let fetched = db.products().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(db.products().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_ordered_by_name() {
        let db = test_db().await;
        let mut lipstick = serum();
        lipstick.name = "argan Oil Shampoo".to_string();
        db.products().insert(&serum()).await.unwrap();
        db.products().insert(&lipstick).await.unwrap();

        let names: Vec<String> = db
            .products()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["argan Oil Shampoo", "Hydrating Face Serum"]);
        assert_eq!(db.products().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_patch_bumps_version() {
        let db = test_db().await;
        let created = db.products().insert(&serum()).await.unwrap();

        let patch = ProductPatch {
            selling_price_cents: Some(3199),
            low_stock_threshold: Some(None),
            ..Default::default()
        };
        let updated = db.products().update(&created.id, &patch).await.unwrap();

        assert_eq!(updated.selling_price_cents, 3199);
        assert_eq!(updated.low_stock_threshold, None);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.version, 2);

        let stored = db.products().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(stored.selling_price_cents, 3199);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = test_db().await;
        let err = db
            .products()
            .update("missing", &ProductPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let created = db.products().insert(&serum()).await.unwrap();

        db.products().delete(&created.id).await.unwrap();
        assert!(db.products().get_by_id(&created.id).await.unwrap().is_none());

        let err = db.products().delete(&created.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
