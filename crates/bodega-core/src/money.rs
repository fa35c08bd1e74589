//! # Money Module
//!
//! The `Money` type and the two-currency exchange math.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    Every stored amount is cents (i64). Fractions only appear at     │
//! │    the single place they are unavoidable: converting between the    │
//! │    two currencies through an observed exchange rate. That rounding  │
//! │    happens in exactly one type (ExchangeRate), once per amount.     │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Currencies
//! The catalog is priced in a stable foreign currency; customers tender in
//! either that currency or the volatile local one. A sale freezes the rate
//! at creation, and every later conversion for that sale goes through the
//! frozen value:
//!
//! - tendered local  → foreign equivalent = amount / rate
//! - tendered foreign → local equivalent  = amount × rate

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Currency-agnostic: the surrounding field or parameter says which of the
/// two currencies an amount is in; `Money` only owns the integer arithmetic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, Default,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero amount.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks whether the amount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies by a quantity, saturating on overflow.
    ///
    /// Quantities are validated to small positive numbers long before this
    /// is reached; saturation is the backstop, not the contract.
    #[inline]
    pub fn times(&self, quantity: i64) -> Money {
        Money(self.0.saturating_mul(quantity))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, rhs: i64) -> Money {
        Money(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl fmt::Display for Money {
    /// Formats as major.minor, e.g. `1099` cents → `10.99`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

// =============================================================================
// Exchange Rate
// =============================================================================

/// An exchange rate: units of local currency per one unit of foreign.
///
/// Construction validates the value, so a held `ExchangeRate` is always
/// finite and strictly positive — conversions cannot divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExchangeRate(f64);

impl ExchangeRate {
    /// Wraps a rate value, rejecting zero, negatives, NaN and infinities.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::MustBePositive {
                field: "rate".to_string(),
            });
        }
        Ok(ExchangeRate(value))
    }

    /// Returns the raw rate value.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Converts a local-currency amount to its foreign-currency equivalent.
    ///
    /// Rounds half away from zero to whole cents.
    pub fn to_foreign(&self, local: Money) -> Money {
        Money::from_cents((local.cents() as f64 / self.0).round() as i64)
    }

    /// Converts a foreign-currency amount to its local-currency equivalent.
    ///
    /// Rounds half away from zero to whole cents.
    pub fn to_local(&self, foreign: Money) -> Money {
        Money::from_cents((foreign.cents() as f64 * self.0).round() as i64)
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_arithmetic() {
        let a = Money::from_cents(1099);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1599);
        assert_eq!((a - b).cents(), 599);
        assert_eq!((a * 3).cents(), 3297);
        assert_eq!(a.times(3).cents(), 3297);
    }

    #[test]
    fn test_money_sum() {
        let total: Money = [100, 250, 49].iter().map(|c| Money::from_cents(*c)).sum();
        assert_eq!(total.cents(), 399);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-250).to_string(), "-2.50");
    }

    #[test]
    fn test_rate_rejects_bad_values() {
        assert!(ExchangeRate::new(0.0).is_err());
        assert!(ExchangeRate::new(-1.5).is_err());
        assert!(ExchangeRate::new(f64::NAN).is_err());
        assert!(ExchangeRate::new(f64::INFINITY).is_err());
        assert!(ExchangeRate::new(36.54).is_ok());
    }

    #[test]
    fn test_conversion_both_directions() {
        // At a rate of 40: 100.00 local is 2.50 foreign, and 5.00 foreign
        // is 200.00 local.
        let rate = ExchangeRate::new(40.0).unwrap();

        let foreign = rate.to_foreign(Money::from_cents(10_000));
        assert_eq!(foreign.cents(), 250);

        let local = rate.to_local(Money::from_cents(500));
        assert_eq!(local.cents(), 20_000);
    }

    #[test]
    fn test_conversion_rounds_to_cents() {
        let rate = ExchangeRate::new(3.0).unwrap();

        // 100 cents / 3 = 33.33... → 33
        assert_eq!(rate.to_foreign(Money::from_cents(100)).cents(), 33);
        // 50 cents / 3 = 16.66... → 17
        assert_eq!(rate.to_foreign(Money::from_cents(50)).cents(), 17);
    }
}
