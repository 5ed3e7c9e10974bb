//! Type-safe money and discount representation using decimal arithmetic.
//!
//! All storefront amounts are US dollars, so [`Price`] carries no currency.
//! Arithmetic stays exact; rounding to cents happens only when a derived
//! total is produced ([`Price::round_cents`], [`DiscountRate::apply`]).

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A non-negative dollar amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal dollar amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Build a price from integer cents (`29999` is `$299.99`).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Round half away from zero to whole cents.
    #[must_use]
    pub fn round_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Subtract without going below zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        if other.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - other.0)
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Errors that can occur when constructing a [`DiscountRate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscountRateError {
    /// The fraction is negative or not strictly below one.
    #[error("discount fraction must be in [0, 1), got {0}")]
    OutOfRange(Decimal),
}

/// A coupon discount expressed as a fraction in `[0, 1)`.
///
/// ```
/// use rust_decimal::Decimal;
/// use testmart_core::{DiscountRate, Price};
///
/// let ten_percent = DiscountRate::new(Decimal::new(10, 2)).unwrap();
/// assert_eq!(ten_percent.apply(Price::from_cents(10_000)), Price::from_cents(9_000));
/// assert!(DiscountRate::new(Decimal::ONE).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct DiscountRate(Decimal);

impl DiscountRate {
    /// No discount.
    pub const NONE: Self = Self(Decimal::ZERO);

    /// Create a discount rate.
    ///
    /// # Errors
    ///
    /// Returns `DiscountRateError::OutOfRange` unless `0 <= fraction < 1`.
    pub fn new(fraction: Decimal) -> Result<Self, DiscountRateError> {
        if fraction < Decimal::ZERO || fraction >= Decimal::ONE {
            return Err(DiscountRateError::OutOfRange(fraction));
        }
        Ok(Self(fraction))
    }

    /// Build from whole percent (`20` is 20%).
    ///
    /// # Errors
    ///
    /// Returns `DiscountRateError::OutOfRange` unless `0 <= percent < 100`.
    pub fn from_percent(percent: u32) -> Result<Self, DiscountRateError> {
        Self::new(Decimal::new(i64::from(percent), 2))
    }

    /// The fraction in `[0, 1)`.
    #[must_use]
    pub const fn fraction(&self) -> Decimal {
        self.0
    }

    /// The rate as a percentage with trailing zeros removed (`0.10` is `10`).
    #[must_use]
    pub fn percent(&self) -> Decimal {
        (self.0 * Decimal::ONE_HUNDRED).normalize()
    }

    /// Whether any discount is in effect.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0.is_zero()
    }

    /// Apply to a subtotal: `subtotal * (1 - fraction)`, rounded to cents.
    #[must_use]
    pub fn apply(&self, subtotal: Price) -> Price {
        Price::new(subtotal.amount() * (Decimal::ONE - self.0)).round_cents()
    }

    /// The amount taken off a subtotal, rounded to cents.
    #[must_use]
    pub fn savings(&self, subtotal: Price) -> Price {
        subtotal.saturating_sub(self.apply(subtotal))
    }
}

impl TryFrom<Decimal> for DiscountRate {
    type Error = DiscountRateError;

    fn try_from(fraction: Decimal) -> Result<Self, Self::Error> {
        Self::new(fraction)
    }
}

impl From<DiscountRate> for Decimal {
    fn from(rate: DiscountRate) -> Self {
        rate.0
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_cents(29_999).to_string(), "$299.99");
        assert_eq!(Price::from_cents(5).to_string(), "$0.05");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_price_line_arithmetic() {
        let unit = Price::from_cents(1_999);
        assert_eq!(unit * 3, Price::from_cents(5_997));
        let total: Price = [unit, unit * 2].into_iter().sum();
        assert_eq!(total, Price::from_cents(5_997));
    }

    #[test]
    fn test_round_cents_half_away_from_zero() {
        let price = Price::new(Decimal::new(12_345, 3));
        assert_eq!(price.round_cents(), Price::from_cents(1_235));
    }

    #[test]
    fn test_discount_bounds() {
        assert!(DiscountRate::new(Decimal::ZERO).is_ok());
        assert!(DiscountRate::new(Decimal::new(99, 2)).is_ok());
        assert!(DiscountRate::new(Decimal::ONE).is_err());
        assert!(DiscountRate::new(Decimal::new(-1, 2)).is_err());
        assert!(DiscountRate::from_percent(100).is_err());
    }

    #[test]
    fn test_discount_apply_and_savings() {
        let half = DiscountRate::from_percent(50).unwrap();
        let subtotal = Price::from_cents(29_999);
        assert_eq!(half.apply(subtotal), Price::from_cents(15_000));
        assert_eq!(half.savings(subtotal), Price::from_cents(14_999));
        assert_eq!(DiscountRate::NONE.apply(subtotal), subtotal);
    }

    #[test]
    fn test_discount_percent_display() {
        let rate = DiscountRate::from_percent(20).unwrap();
        assert_eq!(rate.to_string(), "20%");
    }

    #[test]
    fn test_discount_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<DiscountRate>("\"0.5\"").is_ok());
        assert!(serde_json::from_str::<DiscountRate>("\"1.5\"").is_err());
    }
}
