//! # Export Commands
//!
//! Writes the sales table or the inventory list as a CSV file.
//!
//! ```text
//! export_sales(session, dir, filter)
//!      │
//!      ▼
//! require(ExportData) ──► filtered rows ──► to_delimited_text
//!      │
//!      ├── no rows  ──► ExportOutcome { path: None, rows: 0 }
//!      ▼
//! dir/sales-report-YYYY-MM-DD.csv
//! ```
//!
//! The date in the file name is today in the shop's timezone. A second
//! export on the same day overwrites the first.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::session::require;
use crate::state::{DbState, ManagerConfig};
use beauty_core::export::{
    export_file_name, inventory_export_rows, sales_export_rows, to_delimited_text, ExportKind,
    ExportRecord,
};
use beauty_core::filter::SaleFilter;
use beauty_core::validation::validate_search_query;
use beauty_core::{Action, Session};

/// Where an export landed. `path` is `None` when there was nothing to write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutcome {
    pub path: Option<PathBuf>,
    pub rows: usize,
}

/// Exports the sales visible under `filter`, newest first.
pub async fn export_sales(
    db: &DbState,
    config: &ManagerConfig,
    session: &Session,
    dir: &Path,
    filter: &SaleFilter,
) -> Result<ExportOutcome, ApiError> {
    require(db, session, Action::ExportData).await?;
    let mut filter = filter.clone();
    filter.search = validate_search_query(&filter.search)?;
    debug!(dir = %dir.display(), search = %filter.search, "export_sales command");

    let offset = config.offset();
    let sales = db.inner().sales().list().await?;
    let visible: Vec<_> = filter.apply(&sales, offset).into_iter().cloned().collect();

    let rows = sales_export_rows(&visible, offset);
    write_export(config, dir, ExportKind::Sales, &rows).await
}

/// Exports every product with its effective threshold and status.
pub async fn export_inventory(
    db: &DbState,
    config: &ManagerConfig,
    session: &Session,
    dir: &Path,
) -> Result<ExportOutcome, ApiError> {
    require(db, session, Action::ExportData).await?;
    debug!(dir = %dir.display(), "export_inventory command");

    let products = db.inner().products().list().await?;
    let rows = inventory_export_rows(&products, config.low_stock_threshold);
    write_export(config, dir, ExportKind::Inventory, &rows).await
}

async fn write_export(
    config: &ManagerConfig,
    dir: &Path,
    kind: ExportKind,
    rows: &[ExportRecord],
) -> Result<ExportOutcome, ApiError> {
    if rows.is_empty() {
        info!(?kind, "Nothing to export");
        return Ok(ExportOutcome {
            path: None,
            rows: 0,
        });
    }

    let text = to_delimited_text(rows)?;
    let path = dir.join(export_file_name(kind, config.today(Utc::now())));

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, text).await?;

    info!(?kind, rows = rows.len(), path = %path.display(), "Export written");
    Ok(ExportOutcome {
        path: Some(path),
        rows: rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::sale::{record_sale, RecordSaleRequest};
    use crate::commands::test_support::{demo_state, login_employee};
    use beauty_core::PaymentMethod;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("beauty-export-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_inventory_export() {
        let (db, config) = demo_state().await;
        let session = login_employee(&db, &config).await;
        let dir = temp_dir();

        let outcome = export_inventory(&db, &config, &session, &dir).await.unwrap();
        assert_eq!(outcome.rows, 5);

        let path = outcome.path.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("inventory-report-"));
        assert!(name.ends_with(".csv"));

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Name,Category,Cost Price,Selling Price,Stock,Low Stock Threshold,Status")
        );
        assert!(text.contains("Gel Nail Polish,Nail Care,3.00,9.99,0,5,Out of Stock"));
        assert_eq!(text.lines().count(), 6);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_sales_export_follows_filter() {
        let (db, config) = demo_state().await;
        let session = login_employee(&db, &config).await;
        let dir = temp_dir();

        let empty = export_sales(&db, &config, &session, &dir, &SaleFilter::default())
            .await
            .unwrap();
        assert_eq!(empty, ExportOutcome { path: None, rows: 0 });
        assert!(!dir.exists());

        let products = db.inner().products().list().await.unwrap();
        for (name, method) in [
            ("Argan Oil Shampoo", PaymentMethod::Cash),
            ("Hydrating Face Serum", PaymentMethod::Card),
        ] {
            let product = products.iter().find(|p| p.name == name).unwrap();
            let req = RecordSaleRequest {
                product_id: product.id.clone(),
                quantity: 1,
                payment_method: method,
            };
            record_sale(&db, &config, &session, &req).await.unwrap();
        }

        let cash = SaleFilter {
            payment_method: Some(PaymentMethod::Cash),
            ..Default::default()
        };
        let outcome = export_sales(&db, &config, &session, &dir, &cash).await.unwrap();
        assert_eq!(outcome.rows, 1);

        let text = std::fs::read_to_string(outcome.path.unwrap()).unwrap();
        assert!(text.starts_with(
            "Date,Product,Quantity,Unit Price,Total Amount,Payment Method,Employee\n"
        ));
        assert!(text.contains(",Argan Oil Shampoo,1,18.99,18.99,cash,Sarah Johnson\n"));
        assert!(!text.contains("Hydrating Face Serum"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
