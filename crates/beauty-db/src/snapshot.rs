//! # JSON Snapshots
//!
//! Whole-store backup and restore in one JSON document.
//!
//! ```text
//! {
//!   "beautyShopProducts": [ Product, ... ],
//!   "beautyShopSales":    [ Sale, ... ],
//!   "beautyShopUsers":    [ { ...User, "password_hash": "$argon2id$..." }, ... ]
//! }
//! ```
//!
//! Import only targets an empty store and runs in a single transaction:
//! either every record lands or none does.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::product::insert_product_row;
use crate::repository::sale::insert_sale_row;
use crate::repository::user::{insert_user_row, Credentials};
use beauty_core::validation::validate_product;
use beauty_core::{Product, Sale};

/// Every record in the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "beautyShopProducts", default)]
    pub products: Vec<Product>,
    #[serde(rename = "beautyShopSales", default)]
    pub sales: Vec<Sale>,
    #[serde(rename = "beautyShopUsers", default)]
    pub users: Vec<Credentials>,
}

impl Snapshot {
    pub fn to_json(&self) -> DbResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> DbResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn record_count(&self) -> usize {
        self.products.len() + self.sales.len() + self.users.len()
    }
}

/// Reads the whole store. Sessions are not part of a snapshot.
pub async fn export_snapshot(db: &Database) -> DbResult<Snapshot> {
    let snapshot = Snapshot {
        products: db.products().list().await?,
        sales: db.sales().list().await?,
        users: db.users().list_credentials().await?,
    };

    info!(records = snapshot.record_count(), "Snapshot exported");
    Ok(snapshot)
}

/// Loads a snapshot into an empty store, ids and versions preserved.
///
/// ## Errors
/// * `Snapshot` - the store already holds products, sales or profiles,
///   or a product breaks the inventory field rules
pub async fn import_snapshot(db: &Database, snapshot: &Snapshot) -> DbResult<()> {
    for product in &snapshot.products {
        validate_product(product)
            .map_err(|e| DbError::Snapshot(format!("product {}: {e}", product.id)))?;
    }

    let existing =
        db.products().count().await? + db.sales().count().await? + db.users().count().await?;
    if existing > 0 {
        return Err(DbError::Snapshot(format!(
            "store is not empty ({existing} records)"
        )));
    }

    let mut tx = db.pool().begin().await?;

    for product in &snapshot.products {
        insert_product_row(&mut *tx, product).await?;
    }
    for sale in &snapshot.sales {
        insert_sale_row(&mut *tx, sale).await?;
    }
    for creds in &snapshot.users {
        insert_user_row(&mut *tx, &creds.user, &creds.password_hash).await?;
    }

    tx.commit().await?;

    info!(records = snapshot.record_count(), "Snapshot imported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_demo_data;
    use crate::DbConfig;
    use beauty_core::sales::plan_sale;
    use beauty_core::PaymentMethod;
    use chrono::Utc;

    async fn populated() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_demo_data(&db).await.unwrap();

        let product = db.products().list().await.unwrap().remove(0);
        let employee = db.users().list().await.unwrap().remove(0);
        let sale = plan_sale(&product, 1, PaymentMethod::Card, &employee, Utc::now()).unwrap();
        db.sales().record(&sale, product.version).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_export_then_import_reproduces_records() {
        let source = populated().await;
        let snapshot = export_snapshot(&source).await.unwrap();
        assert_eq!(snapshot.record_count(), 5 + 1 + 2);

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"beautyShopProducts\""));
        assert!(json.contains("\"beautyShopSales\""));
        assert!(json.contains("\"beautyShopUsers\""));

        let target = Database::new(DbConfig::in_memory()).await.unwrap();
        import_snapshot(&target, &Snapshot::from_json(&json).unwrap())
            .await
            .unwrap();

        assert_eq!(export_snapshot(&target).await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_import_rejects_out_of_range_price() {
        let mut snapshot = export_snapshot(&populated().await).await.unwrap();
        snapshot.products[0].selling_price_cents = i64::MAX / 2 + 1;

        let target = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = import_snapshot(&target, &snapshot).await.unwrap_err();
        assert!(matches!(err, DbError::Snapshot(_)));
        assert_eq!(target.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_import_into_populated_store_rejected() {
        let db = populated().await;
        let snapshot = export_snapshot(&db).await.unwrap();

        let err = import_snapshot(&db, &snapshot).await.unwrap_err();
        assert!(matches!(err, DbError::Snapshot(_)));
    }

    #[tokio::test]
    async fn test_failed_import_leaves_store_empty() {
        let source = populated().await;
        let mut snapshot = export_snapshot(&source).await.unwrap();
        // Same email twice violates the unique index mid-transaction
        let dup = snapshot.users[0].clone();
        snapshot.users.push(Credentials {
            user: beauty_core::User {
                id: "other".to_string(),
                ..dup.user
            },
            password_hash: dup.password_hash,
        });

        let target = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(import_snapshot(&target, &snapshot).await.is_err());
        assert_eq!(target.products().count().await.unwrap(), 0);
        assert_eq!(target.users().count().await.unwrap(), 0);
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        let snapshot = Snapshot::from_json("{}").unwrap();
        assert_eq!(snapshot.record_count(), 0);
        assert!(Snapshot::from_json("not json").is_err());
    }
}
