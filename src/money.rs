//! Decimal money type for prices and sales amounts.
//!
//! Wraps `rust_decimal` so that revenue math never goes through binary
//! floating point. Values keep their full precision; rounding to cents only
//! happens when asked for or when displayed.
//!
//! Addition saturates at the largest representable value instead of
//! panicking. Multiplication by a quantity comes in a checked and a
//! saturating form.

use crate::error::SalesError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// A monetary value (unit price, line amount or total).
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use sales_analytics::Money;
///
/// let price = Money::from_str("45,000").unwrap();
/// assert_eq!(price.checked_times(2).unwrap().to_string(), "90000.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Number of decimal places used for display and rounding.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Largest representable value.
    pub const MAX: Self = Money(Decimal::MAX);

    /// Returns the underlying decimal.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Rounds to two decimal places, half to even.
    pub fn round_cents(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointNearestEven),
        )
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// `self × quantity`, or `None` if the product does not fit in a decimal.
    pub fn checked_times(&self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(Decimal::from(quantity)).map(Money)
    }

    /// `self × quantity`, clamped to the representable range.
    pub fn saturating_times(&self, quantity: i64) -> Money {
        Money(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Share of `self` in `total` as a percentage rounded to two places.
    ///
    /// Returns zero when `total` is zero.
    pub fn percent_of(&self, total: Money) -> Decimal {
        // divide first: self * 100 can overflow near Decimal::MAX
        let mut share = self
            .0
            .checked_div(total.0)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|pct| {
                pct.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointNearestEven)
            })
            .unwrap_or(Decimal::ZERO);
        share.rescale(Self::SCALE);
        share
    }
}

impl FromStr for Money {
    type Err = SalesError;

    /// Parses a decimal, ignoring comma thousands separators and surrounding
    /// whitespace.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let cleaned = s.replace(',', "");
        Decimal::from_str(cleaned.trim())
            .map(Money)
            .map_err(|_| SalesError::InvalidAmount(s.to_string()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round_cents().0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.normalize().to_string())
    }
}
