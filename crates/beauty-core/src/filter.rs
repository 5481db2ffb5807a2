//! # List Filters
//!
//! Search and filter rules behind the inventory and sales tables.

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::report::local_date;
use crate::types::{PaymentMethod, Product, Sale, StockStatus};

/// Stock dropdown on the inventory screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StockFilter {
    #[default]
    All,
    /// At or below threshold, out of stock included.
    Low,
    /// Stock is zero.
    Out,
}

/// Inventory table filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductFilter {
    /// Case-insensitive substring of name or category.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub stock: StockFilter,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product, default_threshold: i64) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && !product.name.to_lowercase().contains(&needle)
            && !product.category.to_lowercase().contains(&needle)
        {
            return false;
        }

        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if product.category != category {
                return false;
            }
        }

        match self.stock {
            StockFilter::All => true,
            StockFilter::Low => product.stock_status(default_threshold).needs_restock(),
            StockFilter::Out => product.stock_status(default_threshold) == StockStatus::OutOfStock,
        }
    }

    pub fn apply<'a>(&self, products: &'a [Product], default_threshold: i64) -> Vec<&'a Product> {
        products
            .iter()
            .filter(|p| self.matches(p, default_threshold))
            .collect()
    }
}

/// Sales table filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleFilter {
    /// Case-insensitive substring of product or employee name.
    #[serde(default)]
    pub search: String,
    /// Local calendar date of the sale.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

impl SaleFilter {
    pub fn matches(&self, sale: &Sale, offset: FixedOffset) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && !sale.product_name.to_lowercase().contains(&needle)
            && !sale.employee_name.to_lowercase().contains(&needle)
        {
            return false;
        }

        if let Some(date) = self.date {
            if local_date(sale.sold_at, offset) != date {
                return false;
            }
        }

        self.payment_method.map_or(true, |m| m == sale.payment_method)
    }

    pub fn apply<'a>(&self, sales: &'a [Sale], offset: FixedOffset) -> Vec<&'a Sale> {
        sales.iter().filter(|s| self.matches(s, offset)).collect()
    }
}

/// Distinct categories in first-seen order, for the category dropdown.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !seen.iter().any(|c| *c == product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}
