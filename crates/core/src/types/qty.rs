//! Item quantities.
//!
//! Quantities arrive from storage either as JSON numbers or as decimal strings
//! (`"2.0000"`). [`StoredQty`] keeps whatever was stored; [`Qty`] is the parsed
//! numeric value used for arithmetic and output.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Errors reading or combining quantities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QtyError {
    /// A stored quantity could not be read as a number.
    #[error("invalid quantity: {0:?}")]
    Invalid(String),
    /// Quantity or line total arithmetic left the decimal range.
    #[error("quantity arithmetic overflowed")]
    Overflow,
}

/// A numeric quantity.
///
/// Serializes as a JSON integer when the value is integral and as a float
/// otherwise, so `2.0000` renders as `2` and `1.5` as `1.5`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Qty(Decimal);

impl Qty {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal quantity.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// The underlying decimal value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Sum of two quantities.
    ///
    /// # Errors
    ///
    /// Returns `QtyError::Overflow` if the sum does not fit a decimal.
    pub fn checked_add(self, rhs: Self) -> Result<Self, QtyError> {
        self.0.checked_add(rhs.0).map(Self).ok_or(QtyError::Overflow)
    }

    /// Line total of `price` times this quantity.
    ///
    /// # Errors
    ///
    /// Returns `QtyError::Overflow` if the product does not fit a decimal.
    pub fn times(self, price: Decimal) -> Result<Decimal, QtyError> {
        price.checked_mul(self.0).ok_or(QtyError::Overflow)
    }
}

impl From<i64> for Qty {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<u32> for Qty {
    fn from(value: u32) -> Self {
        Self(Decimal::from(value))
    }
}

impl fmt::Display for Qty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.normalize().fmt(f)
    }
}

impl FromStr for Qty {
    type Err = QtyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Self)
            .map_err(|_| QtyError::Invalid(s.to_string()))
    }
}

impl Serialize for Qty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let normalized = self.0.normalize();
        if normalized.scale() == 0
            && let Some(whole) = normalized.to_i64()
        {
            return serializer.serialize_i64(whole);
        }
        serializer.serialize_f64(normalized.to_f64().unwrap_or_default())
    }
}

/// A quantity exactly as it was stored: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredQty {
    Number(serde_json::Number),
    Text(String),
}

impl StoredQty {
    /// Parse the stored value into a numeric quantity.
    ///
    /// # Errors
    ///
    /// Returns `QtyError` if the stored value is not a decimal number.
    pub fn parse(&self) -> Result<Qty, QtyError> {
        match self {
            Self::Number(n) => n.to_string().parse(),
            Self::Text(s) => s.parse(),
        }
    }
}

impl From<Qty> for StoredQty {
    fn from(qty: Qty) -> Self {
        Self::Text(qty.to_string())
    }
}
