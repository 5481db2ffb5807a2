//! # Export Formatter
//!
//! Turns uniform key-value rows into comma separated text.
//!
//! ```text
//! [ExportRecord { Date, Product, Quantity, ... }, ...]
//!        │
//!        ▼
//! header  = keys of the first record, in insertion order
//! rows    = values in header order, missing key → empty field
//! quoting = only when a value holds a comma, a quote or a line break
//!        │
//!        ▼
//! "Date,Product,Quantity\n2024-05-15,\"Toner, 200ml\",2\n"
//! ```
//!
//! Writing the text to disk is the manager's job. This module stays in memory.

use chrono::{FixedOffset, NaiveDate};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::ExportError;
use crate::report::local_date;
use crate::types::{Product, Sale};

// =============================================================================
// Export Record
// =============================================================================

/// One output row as ordered `(column, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRecord {
    fields: Vec<(String, String)>,
}

impl ExportRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column, builder style.
    ///
    /// ```rust
    /// use beauty_core::export::ExportRecord;
    ///
    /// let row = ExportRecord::new().with("Name", "Toner").with("Stock", 12);
    /// assert_eq!(row.get("Stock"), Some("12"));
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    /// Appends a column. A repeated key overwrites the earlier value.
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// =============================================================================
// Formatter
// =============================================================================

/// Renders records as delimited text.
///
/// Empty input yields an empty string. Every row, header included, ends
/// with `\n`. A row that is a single empty field is written as `""`, so
/// it reads back as one empty value instead of a blank line.
pub fn to_delimited_text(records: &[ExportRecord]) -> Result<String, ExportError> {
    let Some(first) = records.first() else {
        return Ok(String::new());
    };

    let header: Vec<&str> = first.keys().collect();

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&header)?;
    for record in records {
        writer.write_record(header.iter().map(|key| record.get(key).unwrap_or("")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.error().to_string()))?;

    Ok(String::from_utf8(bytes)?)
}

// =============================================================================
// Row Builders
// =============================================================================

/// Sales table rows: Date, Product, Quantity, Unit Price, Total Amount,
/// Payment Method, Employee. Dates are the shop's local calendar date.
pub fn sales_export_rows(sales: &[Sale], offset: FixedOffset) -> Vec<ExportRecord> {
    sales
        .iter()
        .map(|sale| {
            ExportRecord::new()
                .with("Date", local_date(sale.sold_at, offset).format("%Y-%m-%d"))
                .with("Product", &sale.product_name)
                .with("Quantity", sale.quantity)
                .with("Unit Price", sale.unit_price().to_decimal_string())
                .with("Total Amount", sale.total().to_decimal_string())
                .with("Payment Method", sale.payment_method)
                .with("Employee", &sale.employee_name)
        })
        .collect()
}

/// Inventory table rows: Name, Category, Cost Price, Selling Price, Stock,
/// Low Stock Threshold, Status.
pub fn inventory_export_rows(products: &[Product], default_threshold: i64) -> Vec<ExportRecord> {
    products
        .iter()
        .map(|product| {
            ExportRecord::new()
                .with("Name", &product.name)
                .with("Category", &product.category)
                .with("Cost Price", product.cost_price().to_decimal_string())
                .with("Selling Price", product.selling_price().to_decimal_string())
                .with("Stock", product.stock_qty)
                .with("Low Stock Threshold", product.effective_threshold(default_threshold))
                .with("Status", product.stock_status(default_threshold).label())
        })
        .collect()
}

/// Which table an export file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Sales,
    Inventory,
}

/// File name for an export made on `today`, e.g. `sales-report-2024-05-15.csv`.
pub fn export_file_name(kind: ExportKind, today: NaiveDate) -> String {
    let prefix = match kind {
        ExportKind::Sales => "sales-report",
        ExportKind::Inventory => "inventory-report",
    };
    format!("{prefix}-{}.csv", today.format("%Y-%m-%d"))
}

// =============================================================================
// Unit Tests
// =============================================================================
