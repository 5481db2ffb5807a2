//! # Reporting Engine
//!
//! Pure aggregation over borrowed sales and products.
//!
//! ## Report Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  &[Sale] ──► filter by DateRange (local calendar date, inclusive)       │
//! │                  │                                                      │
//! │                  ├──► total_revenue / total_items / total_sales         │
//! │                  ├──► average_sale  (revenue / count, truncating)       │
//! │                  ├──► payment_breakdown { cash, card, mobile }          │
//! │                  └──► top_products (group by name, first-seen order,    │
//! │                        stable sort by revenue desc, keep 5)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales are stored in UTC. A [`DateRange`] carries the shop's UTC offset
//! so "today" means the shop's today, not Greenwich's.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{PaymentMethod, Product, Sale, StockStatus};
use crate::validation::ValidationResult;
use crate::TOP_PRODUCTS_LIMIT;

// =============================================================================
// Time Helpers
// =============================================================================

/// Largest offset accepted, in minutes either side of UTC.
pub const MAX_UTC_OFFSET_MINUTES: i32 = 1439;

/// Turns a minute offset into a chrono offset.
pub fn utc_offset(minutes: i32) -> ValidationResult<FixedOffset> {
    if minutes.abs() > MAX_UTC_OFFSET_MINUTES {
        return Err(ValidationError::OutOfRange {
            field: "utc_offset_minutes".to_string(),
            min: -(MAX_UTC_OFFSET_MINUTES as i64),
            max: MAX_UTC_OFFSET_MINUTES as i64,
        });
    }

    FixedOffset::east_opt(minutes * 60).ok_or_else(|| ValidationError::OutOfRange {
        field: "utc_offset_minutes".to_string(),
        min: -(MAX_UTC_OFFSET_MINUTES as i64),
        max: MAX_UTC_OFFSET_MINUTES as i64,
    })
}

/// Calendar date of a timestamp as seen from the shop's offset.
#[inline]
pub fn local_date(timestamp: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    timestamp.with_timezone(&offset).date_naive()
}

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive calendar-date window evaluated at a fixed UTC offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
    pub utc_offset_minutes: i32,
}

impl DateRange {
    /// Creates a range, rejecting `start > end` and impossible offsets.
    pub fn new(start: NaiveDate, end: NaiveDate, utc_offset_minutes: i32) -> ValidationResult<Self> {
        utc_offset(utc_offset_minutes)?;

        if start > end {
            return Err(ValidationError::InvalidFormat {
                field: "date_range".to_string(),
                reason: format!("start {start} is after end {end}"),
            });
        }

        Ok(DateRange {
            start,
            end,
            utc_offset_minutes,
        })
    }

    /// A single-day range.
    pub fn day(date: NaiveDate, utc_offset_minutes: i32) -> ValidationResult<Self> {
        Self::new(date, date, utc_offset_minutes)
    }

    /// The offset used to turn timestamps into calendar dates.
    ///
    /// A deserialized range with a bad offset falls back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// True when the timestamp's local date lies inside the window.
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        let date = local_date(timestamp, self.offset());
        date >= self.start && date <= self.end
    }

    /// The window as UTC instants: `[start midnight, day after end midnight)`.
    pub fn utc_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let shift = Duration::seconds(self.offset().local_minus_utc() as i64);
        let midnight = |date: NaiveDate| Utc.from_utc_datetime(&(date.and_time(NaiveTime::default()) - shift));

        (midnight(self.start), midnight(self.end) + Duration::days(1))
    }
}

/// Report presets offered by the reports screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "range", rename_all = "lowercase")]
pub enum ReportPeriod {
    /// Today only.
    Daily,
    /// Most recent Sunday through today.
    Weekly,
    /// First of the month through today.
    Monthly,
    Custom(DateRange),
}

impl ReportPeriod {
    /// Resolves the preset against the shop's current date.
    ///
    /// ## Example
    /// ```rust
    /// use beauty_core::report::ReportPeriod;
    /// use chrono::NaiveDate;
    ///
    /// // 2024-05-15 is a Wednesday
    /// let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
    /// let week = ReportPeriod::Weekly.resolve(today, 0).unwrap();
    /// assert_eq!(week.start, NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
    /// assert_eq!(week.end, today);
    /// ```
    pub fn resolve(&self, today: NaiveDate, utc_offset_minutes: i32) -> ValidationResult<DateRange> {
        match self {
            ReportPeriod::Daily => DateRange::day(today, utc_offset_minutes),
            ReportPeriod::Weekly => {
                let back = today.weekday().num_days_from_sunday() as i64;
                DateRange::new(today - Duration::days(back), today, utc_offset_minutes)
            }
            ReportPeriod::Monthly => {
                let first = today.with_day(1).unwrap_or(today);
                DateRange::new(first, today, utc_offset_minutes)
            }
            ReportPeriod::Custom(range) => DateRange::new(range.start, range.end, range.utc_offset_minutes),
        }
    }
}

// =============================================================================
// Sales Report
// =============================================================================

/// Revenue partitioned by payment method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentBreakdown {
    pub cash: Money,
    pub card: Money,
    pub mobile: Money,
}

impl PaymentBreakdown {
    pub fn get(&self, method: PaymentMethod) -> Money {
        match method {
            PaymentMethod::Cash => self.cash,
            PaymentMethod::Card => self.card,
            PaymentMethod::Mobile => self.mobile,
        }
    }

    fn add(&mut self, method: PaymentMethod, amount: Money) {
        match method {
            PaymentMethod::Cash => self.cash += amount,
            PaymentMethod::Card => self.card += amount,
            PaymentMethod::Mobile => self.mobile += amount,
        }
    }

    /// Sum of all methods. Equals the report's total revenue.
    pub fn total(&self) -> Money {
        self.cash + self.card + self.mobile
    }
}

/// One row of the top products table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopProduct {
    pub name: String,
    pub quantity: i64,
    pub revenue: Money,
}

/// Aggregate view of the sales inside a window. Never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    pub total_revenue: Money,
    pub total_items: i64,
    pub total_sales: i64,
    pub average_sale: Money,
    pub payment_breakdown: PaymentBreakdown,
    pub top_products: Vec<TopProduct>,
}

/// Builds a sales report from the sales inside `range` (all sales if `None`).
///
/// ## Example
/// ```rust
/// use beauty_core::report::build_report;
///
/// let report = build_report(&[], None);
/// assert_eq!(report.total_sales, 0);
/// assert!(report.average_sale.is_zero());
/// ```
pub fn build_report(sales: &[Sale], range: Option<&DateRange>) -> SalesReport {
    let mut report = SalesReport::default();
    let mut top: Vec<TopProduct> = Vec::new();
    let mut slot_by_name: HashMap<&str, usize> = HashMap::new();

    for sale in sales.iter().filter(|s| range.map_or(true, |r| r.contains(s.sold_at))) {
        let total = sale.total();

        report.total_revenue += total;
        report.total_items += sale.quantity;
        report.total_sales += 1;
        report.payment_breakdown.add(sale.payment_method, total);

        let slot = *slot_by_name.entry(sale.product_name.as_str()).or_insert_with(|| {
            top.push(TopProduct {
                name: sale.product_name.clone(),
                quantity: 0,
                revenue: Money::zero(),
            });
            top.len() - 1
        });
        top[slot].quantity += sale.quantity;
        top[slot].revenue += total;
    }

    // sort_by is stable: equal revenue keeps first-seen order
    top.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    top.truncate(TOP_PRODUCTS_LIMIT);

    report.average_sale = report.total_revenue.average_over(report.total_sales);
    report.top_products = top;
    report
}

// =============================================================================
// Inventory & Dashboard
// =============================================================================

/// Stock level counts for the inventory screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventorySummary {
    pub total_products: i64,
    pub in_stock: i64,
    pub low_stock: i64,
    pub out_of_stock: i64,
    /// Names for the restock alert banner (low and out of stock).
    pub restock_names: Vec<String>,
}

pub fn inventory_summary(products: &[Product], default_threshold: i64) -> InventorySummary {
    let mut summary = InventorySummary::default();

    for product in products {
        let status = product.stock_status(default_threshold);
        summary.total_products += 1;
        match status {
            StockStatus::InStock => summary.in_stock += 1,
            StockStatus::LowStock => summary.low_stock += 1,
            StockStatus::OutOfStock => summary.out_of_stock += 1,
        }
        if status.needs_restock() {
            summary.restock_names.push(product.name.clone());
        }
    }

    summary
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    pub today_sales: i64,
    pub today_revenue: Money,
    pub total_products: i64,
    /// Products at or below their threshold, out of stock included.
    pub low_stock_count: i64,
}

pub fn dashboard_summary(
    sales: &[Sale],
    products: &[Product],
    today: NaiveDate,
    offset: FixedOffset,
    default_threshold: i64,
) -> DashboardSummary {
    let todays = sales.iter().filter(|s| local_date(s.sold_at, offset) == today);

    let (today_sales, today_revenue) =
        todays.fold((0i64, Money::zero()), |(count, revenue), sale| (count + 1, revenue + sale.total()));

    DashboardSummary {
        today_sales,
        today_revenue,
        total_products: products.len() as i64,
        low_stock_count: products
            .iter()
            .filter(|p| p.stock_status(default_threshold).needs_restock())
            .count() as i64,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
