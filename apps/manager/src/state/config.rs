//! # Manager Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`BEAUTY_*`)
//! 2. Defaults (this file)
//!
//! Read-only after initialization, so no lock.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use beauty_core::report::{local_date, utc_offset};
use beauty_core::{Money, DEFAULT_LOW_STOCK_THRESHOLD};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerConfig {
    /// SQLite file. `None` means the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Shop name shown in the dashboard header.
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Threshold for products without their own.
    /// Default: 5
    pub low_stock_threshold: i64,

    /// Session lifetime in hours.
    /// Default: 12
    pub session_ttl_hours: i64,

    /// Shop's offset from UTC, used for "today" and calendar dates.
    /// Default: 0
    pub utc_offset_minutes: i32,

    /// Attempts at the stock compare-and-swap before giving up.
    /// Default: 3
    pub sale_retry_limit: u32,

    /// Seed demo profiles and products into an empty store on startup.
    /// Default: true
    pub seed_demo_data: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        ManagerConfig {
            db_path: None,
            store_name: "Beauty Shop".to_string(),
            currency_symbol: "$".to_string(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            session_ttl_hours: 12,
            utc_offset_minutes: 0,
            sale_retry_limit: 3,
            seed_demo_data: true,
        }
    }
}

impl ManagerConfig {
    /// Creates a ManagerConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `BEAUTY_DB_PATH`: SQLite file path
    /// - `BEAUTY_STORE_NAME`: Shop name
    /// - `BEAUTY_CURRENCY_SYMBOL`: e.g. "€"
    /// - `BEAUTY_LOW_STOCK_THRESHOLD`: default threshold (>= 0)
    /// - `BEAUTY_SESSION_TTL_HOURS`: session lifetime (>= 1)
    /// - `BEAUTY_UTC_OFFSET_MINUTES`: e.g. "-300" for UTC-5
    /// - `BEAUTY_SALE_RETRY_LIMIT`: CAS attempts (>= 1)
    /// - `BEAUTY_SEED_DEMO_DATA`: "true" / "false"
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ManagerConfig::default();

        if let Some(path) = lookup("BEAUTY_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("BEAUTY_STORE_NAME") {
            config.store_name = name;
        }

        if let Some(symbol) = lookup("BEAUTY_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(v) = parse_var::<i64>(&lookup, "BEAUTY_LOW_STOCK_THRESHOLD") {
            if v >= 0 {
                config.low_stock_threshold = v;
            }
        }

        if let Some(v) = parse_var::<i64>(&lookup, "BEAUTY_SESSION_TTL_HOURS") {
            if v >= 1 {
                config.session_ttl_hours = v;
            }
        }

        if let Some(v) = parse_var::<i32>(&lookup, "BEAUTY_UTC_OFFSET_MINUTES") {
            if utc_offset(v).is_ok() {
                config.utc_offset_minutes = v;
            } else {
                warn!(value = v, "BEAUTY_UTC_OFFSET_MINUTES out of range, using UTC");
            }
        }

        if let Some(v) = parse_var::<u32>(&lookup, "BEAUTY_SALE_RETRY_LIMIT") {
            config.sale_retry_limit = v.max(1);
        }

        if let Some(v) = parse_var::<bool>(&lookup, "BEAUTY_SEED_DEMO_DATA") {
            config.seed_demo_data = v;
        }

        config
    }

    /// Database file, falling back to the platform data directory.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.beautyshop.manager/beauty-shop.db`
    /// - **Windows**: `%APPDATA%\beautyshop\manager\data\beauty-shop.db`
    /// - **Linux**: `~/.local/share/manager/beauty-shop.db`
    pub fn database_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.db_path {
            return Some(path.clone());
        }

        ProjectDirs::from("com", "beautyshop", "manager")
            .map(|dirs| dirs.data_dir().join("beauty-shop.db"))
    }

    /// The shop's UTC offset. Out-of-range values fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        utc_offset(self.utc_offset_minutes).unwrap_or_else(|_| Utc.fix())
    }

    /// Today's date in the shop's timezone.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        local_date(now, self.offset())
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use beauty_manager::state::ManagerConfig;
    ///
    /// let config = ManagerConfig::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        Money::from_cents(cents).format_with_symbol(&self.currency_symbol)
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ManagerConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ManagerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, ManagerConfig::default());
        assert_eq!(config.low_stock_threshold, 5);
        assert_eq!(config.session_ttl_hours, 12);
        assert_eq!(config.sale_retry_limit, 3);
        assert!(config.seed_demo_data);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BEAUTY_DB_PATH", "/tmp/shop.db"),
            ("BEAUTY_STORE_NAME", "Glow Studio"),
            ("BEAUTY_LOW_STOCK_THRESHOLD", "8"),
            ("BEAUTY_UTC_OFFSET_MINUTES", "-300"),
            ("BEAUTY_SEED_DEMO_DATA", "false"),
        ]);
        assert_eq!(config.database_path(), Some(PathBuf::from("/tmp/shop.db")));
        assert_eq!(config.store_name, "Glow Studio");
        assert_eq!(config.low_stock_threshold, 8);
        assert_eq!(config.utc_offset_minutes, -300);
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn test_bad_values_ignored() {
        let config = config_from(&[
            ("BEAUTY_LOW_STOCK_THRESHOLD", "-1"),
            ("BEAUTY_SESSION_TTL_HOURS", "soon"),
            ("BEAUTY_UTC_OFFSET_MINUTES", "5000"),
            ("BEAUTY_SALE_RETRY_LIMIT", "0"),
        ]);
        assert_eq!(config.low_stock_threshold, 5);
        assert_eq!(config.session_ttl_hours, 12);
        assert_eq!(config.utc_offset_minutes, 0);
        assert_eq!(config.sale_retry_limit, 1);
    }

    #[test]
    fn test_today_uses_offset() {
        use chrono::TimeZone;
        let config = config_from(&[("BEAUTY_UTC_OFFSET_MINUTES", "-300")]);
        let now = Utc.with_ymd_and_hms(2024, 5, 16, 2, 0, 0).unwrap();
        assert_eq!(config.today(now), NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
    }

    #[test]
    fn test_format_currency() {
        let config = ManagerConfig::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(0), "$0.00");
        assert_eq!(config.format_currency(-1234), "-$12.34");
    }
}
