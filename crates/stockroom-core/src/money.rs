//! # Money Module
//!
//! Currency handling at the edges of the basket engine.
//!
//! ## Where Rounding Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FULL PRECISION INSIDE, CENTS OUTSIDE                                   │
//! │                                                                         │
//! │  BasketEngine keeps f64 amounts and never rounds between operations:    │
//! │    add_line → set_price → set_quantity → ... (no drift)                │
//! │                                                                         │
//! │  Rounding to 2 decimals happens exactly once, when an amount leaves:   │
//! │    • purchase payload for the backend                                   │
//! │    • receipt preview for the frontend                                   │
//! │                                                                         │
//! │  Money (integer cents) is the type for those boundary values.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::money::{round_currency, Money};
//!
//! let total = Money::from_amount(84.745762711);
//! assert_eq!(total.cents(), 8475);
//! assert_eq!(total.to_string(), "84.75");
//!
//! assert_eq!(round_currency(15.254237288), 15.25);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use ts_rs::TS;

use crate::types::TaxRate;
use crate::CURRENCY_DECIMALS;

// =============================================================================
// Money Type
// =============================================================================

/// A boundary monetary value in cents (smallest currency unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Rounds a full-precision amount to cents, half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::from_amount(590.0).cents(), 59000);
    /// assert_eq!(Money::from_amount(0.125).cents(), 13);
    /// assert_eq!(Money::from_amount(-0.125).cents(), -13);
    /// ```
    ///
    /// Non-finite input maps to zero.
    pub fn from_amount(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        let scale = 10_f64.powi(CURRENCY_DECIMALS as i32);
        // 1.005 is stored as 1.00499..; the nudge keeps decimal halves rounding up.
        let scaled = amount * scale;
        let nudged = scaled + scaled.signum() * 1e-7;
        Money(nudged.round() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the decimal amount (e.g. 1234 cents → 12.34).
    #[inline]
    pub fn amount(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Renders `12.34` / `-5.50`. Currency symbols belong to the frontend
/// configuration, not to this type.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturates at the `i64` bounds instead of wrapping.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Rounds a full-precision amount to currency precision, returning `f64`.
///
/// Used when building payloads whose JSON fields are plain numbers.
pub fn round_currency(amount: f64) -> f64 {
    Money::from_amount(amount).amount()
}

// =============================================================================
// Tax Split
// =============================================================================

/// Decomposition of a tax-inclusive amount.
///
/// `base = total / (1 + rate)`, `tax = total - base`, so
/// `base + tax == total` up to one floating-point rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxSplit {
    pub base: f64,
    pub tax: f64,
    pub total: f64,
}

impl TaxSplit {
    /// Splits a tax-inclusive `total` at `rate`, keeping full precision.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::TaxSplit;
    /// use stockroom_core::TAX_RATE;
    ///
    /// let split = TaxSplit::from_inclusive(118.0, TAX_RATE);
    /// assert!((split.base - 100.0).abs() < 1e-9);
    /// assert!((split.tax - 18.0).abs() < 1e-9);
    /// ```
    pub fn from_inclusive(total: f64, rate: TaxRate) -> Self {
        let base = total / (1.0 + rate.fraction());
        TaxSplit {
            base,
            tax: total - base,
            total,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TAX_RATE;

    #[test]
    fn test_from_amount_rounds_half_away_from_zero() {
        assert_eq!(Money::from_amount(10.994).cents(), 1099);
        assert_eq!(Money::from_amount(10.995).cents(), 1100);
        assert_eq!(Money::from_amount(1.005).cents(), 101);
        assert_eq!(Money::from_amount(-1.005).cents(), -101);
        assert_eq!(Money::from_amount(0.0).cents(), 0);
    }

    #[test]
    fn test_from_amount_non_finite_is_zero() {
        assert!(Money::from_amount(f64::NAN).is_zero());
        assert!(Money::from_amount(f64::INFINITY).is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(250);
        assert_eq!((a + b).cents(), 1250);
        assert_eq!((Money::from_cents(i64::MAX) + a).cents(), i64::MAX);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 1500);
    }

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(84.745762711864), 84.75);
        assert_eq!(round_currency(15.254237288136), 15.25);
        assert_eq!(round_currency(100.0), 100.0);
    }

    #[test]
    fn test_tax_split_one_hundred() {
        let split = TaxSplit::from_inclusive(100.0, TAX_RATE);
        assert!((split.base - 84.745762711864).abs() < 1e-9);
        assert!((split.tax - 15.254237288136).abs() < 1e-9);
        assert!((split.base + split.tax - split.total).abs() < 1e-9);
    }

    #[test]
    fn test_tax_split_zero_rate() {
        let split = TaxSplit::from_inclusive(50.0, TaxRate::zero());
        assert_eq!(split.base, 50.0);
        assert_eq!(split.tax, 0.0);
    }
}
