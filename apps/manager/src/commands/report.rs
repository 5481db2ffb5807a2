//! # Report Commands
//!
//! Reports screen and dashboard headline numbers.
//!
//! ```text
//! sales_report(session, Weekly)
//!      │
//!      ▼
//! period.resolve(today in shop timezone) ──► DateRange [Sunday, today]
//!      │
//!      ▼
//! sales.list_between(range) ──► build_report(sales, range)
//!      │
//!      ▼
//! SalesReport { totals, payment breakdown, top 5 products }
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::session::require;
use crate::state::{DbState, ManagerConfig};
use beauty_core::report::{
    build_report, dashboard_summary, DashboardSummary, DateRange, ReportPeriod, SalesReport,
};
use beauty_core::{Action, Session};

/// A report together with the window it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportResponse {
    pub range: DateRange,
    pub report: SalesReport,
}

/// Builds the sales report for a preset or custom period.
pub async fn sales_report(
    db: &DbState,
    config: &ManagerConfig,
    session: &Session,
    period: &ReportPeriod,
) -> Result<SalesReportResponse, ApiError> {
    require(db, session, Action::ViewReports).await?;
    debug!(?period, "sales_report command");

    report_as_of(db, config, period, config.today(Utc::now())).await
}

/// Resolves `period` relative to `today` and builds the report.
async fn report_as_of(
    db: &DbState,
    config: &ManagerConfig,
    period: &ReportPeriod,
    today: NaiveDate,
) -> Result<SalesReportResponse, ApiError> {
    let range = period.resolve(today, config.utc_offset_minutes)?;

    let sales = db.inner().sales().list_between(&range).await?;
    let report = build_report(&sales, Some(&range));

    debug!(
        start = %range.start,
        end = %range.end,
        sales = report.total_sales,
        revenue = report.total_revenue.cents(),
        "Report built"
    );
    Ok(SalesReportResponse { range, report })
}

/// Today's sales, revenue, product count and restock count.
pub async fn dashboard(
    db: &DbState,
    config: &ManagerConfig,
    session: &Session,
) -> Result<DashboardSummary, ApiError> {
    require(db, session, Action::ViewReports).await?;
    debug!("dashboard command");

    dashboard_as_of(db, config, config.today(Utc::now())).await
}

async fn dashboard_as_of(
    db: &DbState,
    config: &ManagerConfig,
    today: NaiveDate,
) -> Result<DashboardSummary, ApiError> {
    let todays = DateRange::day(today, config.utc_offset_minutes)?;
    let sales = db.inner().sales().list_between(&todays).await?;
    let products = db.inner().products().list().await?;

    Ok(dashboard_summary(
        &sales,
        &products,
        today,
        config.offset(),
        config.low_stock_threshold,
    ))
}
