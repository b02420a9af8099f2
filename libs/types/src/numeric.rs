//! Fixed-point decimal types for prices, sizes and grouping increments
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point errors).
//! Grouped prices are used as merge keys, so they must compare by exact
//! equality; binary floats would make `floor(price / g) * g` drift.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::GroupingError;

/// A non-negative price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Price = Price(Decimal::ZERO);

    /// Create a price, returning None if negative.
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            None
        } else {
            Some(Self(value.normalize()))
        }
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s)?;
        Self::try_new(value).ok_or(rust_decimal::Error::ErrorString(format!(
            "negative price: {s}"
        )))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative resting size. Zero is meaningful in deltas (remove level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Size(Decimal);

impl Size {
    pub const ZERO: Size = Size(Decimal::ZERO);

    /// Create a size, returning None if negative.
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            None
        } else {
            Some(Self(value.normalize()))
        }
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for Size {
    type Output = Size;

    /// Saturates at `Decimal::MAX`.
    fn add(self, rhs: Size) -> Size {
        Size(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX))
    }
}

impl std::iter::Sum for Size {
    fn sum<I: Iterator<Item = Size>>(iter: I) -> Size {
        iter.fold(Size::ZERO, |acc, s| acc + s)
    }
}

impl FromStr for Size {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s)?;
        Self::try_new(value).ok_or(rust_decimal::Error::ErrorString(format!(
            "negative size: {s}"
        )))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Width of a price bucket. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Grouping(Decimal);

impl Grouping {
    /// Create a grouping increment, rejecting zero and negative values.
    pub fn try_new(value: Decimal) -> Result<Self, GroupingError> {
        if value <= Decimal::ZERO {
            return Err(GroupingError::NonPositive(value.to_string()));
        }
        Ok(Self(value.normalize()))
    }

    /// Build from mantissa and scale, e.g. `(25, 1)` is 2.5. Caller guarantees
    /// a positive mantissa.
    pub(crate) fn from_scaled(mantissa: i64, scale: u32) -> Self {
        Self(Decimal::new(mantissa, scale).normalize())
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Grouping {
    type Error = GroupingError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Grouping> for Decimal {
    fn from(grouping: Grouping) -> Self {
        grouping.0
    }
}

impl FromStr for Grouping {
    type Err = GroupingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s).map_err(|_| GroupingError::Unparsable(s.to_string()))?;
        Self::try_new(value)
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
