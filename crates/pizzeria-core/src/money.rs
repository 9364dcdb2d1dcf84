//! # Money Module
//!
//! Integer money for menu prices, order totals and report revenue.
//!
//! ## Representation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every amount is a count of centavos held in an i64.                    │
//! │                                                                         │
//! │    Pizza G          4500  ──┐                                           │
//! │    Mixed surcharge   500  ──┼──► OrderItem.unit_price  5000             │
//! │                              │                                          │
//! │    × quantity 2      ───────┴──► line total           10000             │
//! │                                                                         │
//! │  Sums over thousands of delivered orders stay exact.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pizzeria_core::money::Money;
//!
//! let size_price = Money::from_major_minor(45, 0);
//! let surcharge = Money::from_cents(500);
//! assert_eq!((size_price + surcharge).cents(), 5000);
//! assert_eq!((size_price * 2).to_string(), "90.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

/// A monetary value in the smallest currency unit.
///
/// Signed so that a refund or correction can be represented, although the
/// order engine itself only produces non-negative amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole units and cents.
    ///
    /// For negative amounts only the major part carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies by a line quantity.
    ///
    /// ```rust
    /// use pizzeria_core::money::Money;
    ///
    /// let pastel = Money::from_cents(600);
    /// assert_eq!(pastel.multiply_quantity(3).cents(), 1800);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Renders as `major.minor` without a currency symbol; the symbol is a
/// configuration concern of the presenting layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(45, 0).cents(), 4500);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(5500).to_string(), "55.00");
        assert_eq!(Money::from_cents(805).to_string(), "8.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_sum() {
        let prices = [Money::from_cents(800), Money::from_cents(1500), Money::from_cents(500)];
        let total: Money = prices.iter().sum();
        assert_eq!(total.cents(), 2800);

        let empty: Vec<Money> = Vec::new();
        assert!(empty.into_iter().sum::<Money>().is_zero());
    }

    #[test]
    fn test_arithmetic() {
        let mut total = Money::from_cents(4500);
        total += Money::from_cents(500);
        assert_eq!(total.cents(), 5000);
        assert_eq!((total - Money::from_cents(1000)).cents(), 4000);
        assert_eq!((total * 3).cents(), 15000);
    }
}
