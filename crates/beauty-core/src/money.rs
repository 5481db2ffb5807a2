//! # Money
//!
//! Whole cents in an `i64`. Prices, sale totals, revenue and averages all
//! go through this type, so a thousand $0.10 sales report exactly $100.00.
//!
//! ```text
//! Product.selling_price_cents ──► Sale.unit_price_cents (frozen)
//!                                        │ × quantity
//!                                        ▼
//!                                 Sale.total_cents
//!                                        │ Σ
//!                                        ▼
//!          total_revenue, payment breakdown, top products, average_sale
//! ```
//!
//! ```rust
//! use beauty_core::money::Money;
//!
//! let serum = Money::from_cents(2999);
//! assert_eq!((serum * 3i64).to_decimal_string(), "89.97");
//! assert_eq!(serum.format_with_symbol("€"), "€29.99");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

/// An amount of money in cents. Serializes as a bare integer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Mean over `count` items, truncated toward zero. Zero items give zero.
    ///
    /// ```rust
    /// use beauty_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1000).average_over(3).cents(), 333);
    /// assert!(Money::from_cents(1000).average_over(0).is_zero());
    /// ```
    #[inline]
    pub const fn average_over(&self, count: i64) -> Self {
        match count {
            0 => Money(0),
            n => Money(self.0 / n),
        }
    }

    /// Line total, or `None` when it does not fit in an `i64`.
    #[inline]
    pub const fn checked_mul(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Plain two-decimal form for export columns, e.g. `"10.99"`.
    pub fn to_decimal_string(&self) -> String {
        self.format_with_symbol("")
    }

    /// `symbol` placed after the sign, e.g. `"-€5.50"`.
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{symbol}{}.{:02}", abs / 100, abs % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Unit price times quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::from_cents(5).to_decimal_string(), "0.05");
        assert_eq!(Money::from_cents(-1250).to_decimal_string(), "-12.50");
        assert_eq!(Money::from_cents(699).format_with_symbol("£"), "£6.99");
    }

    #[test]
    fn test_line_total_and_running_sum() {
        let mut revenue = Money::zero();
        revenue += Money::from_cents(1499) * 2;
        revenue += Money::from_cents(999);
        assert_eq!(revenue.cents(), 3997);

        let totals = [Money::from_cents(10), Money::from_cents(20)];
        let by_ref: Money = totals.iter().sum();
        assert_eq!(by_ref, totals.into_iter().sum::<Money>());
    }

    #[test]
    fn test_checked_mul_overflow() {
        assert_eq!(Money::from_cents(1499).checked_mul(3), Some(Money::from_cents(4497)));
        assert_eq!(Money::from_cents(i64::MAX / 2 + 1).checked_mul(2), None);
    }

    #[test]
    fn test_no_float_drift() {
        let total: Money = (0..1000).map(|_| Money::from_cents(10)).sum();
        assert_eq!(total.to_decimal_string(), "100.00");
    }

    #[test]
    fn test_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Money::from_cents(2999)).unwrap(), "2999");
        let back: Money = serde_json::from_str("150").unwrap();
        assert_eq!(back.cents(), 150);
    }

    #[test]
    fn test_average_truncates() {
        assert_eq!(Money::from_cents(999).average_over(1).cents(), 999);
        assert_eq!(Money::from_cents(-1000).average_over(3).cents(), -333);
    }
}
