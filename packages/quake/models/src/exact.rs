//! Arbitrary-precision decimal wrapper.
//!
//! Feed values such as `4.6` or `8.96` are not representable exactly as
//! `f64`, so equality-style filtering compares [`ExactNumber`]s instead of
//! the derived doubles.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Signed, ToPrimitive, Zero};
use serde::Serialize;

/// An exact decimal value. Equality and ordering are numeric, so `8.960`
/// and `8.96` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ExactNumber(BigDecimal);

/// Error returned when text cannot be read as a decimal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid decimal {input:?}")]
pub struct InvalidDecimalError {
    /// The rejected input text.
    pub input: String,
}

impl ExactNumber {
    /// Exact zero.
    #[must_use]
    pub fn zero() -> Self {
        Self(BigDecimal::zero())
    }

    /// Wraps an existing [`BigDecimal`].
    #[must_use]
    pub const fn from_decimal(value: BigDecimal) -> Self {
        Self(value)
    }

    /// Borrows the underlying decimal.
    #[must_use]
    pub const fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Divides by an integer divisor. Division by powers of ten is exact.
    #[must_use]
    pub fn divided_by(&self, divisor: i64) -> Self {
        Self(self.0.clone() / BigDecimal::from(divisor))
    }

    /// Whether the value is strictly below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Nearest `f64` projection of this value.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }
}

impl Default for ExactNumber {
    fn default() -> Self {
        Self::zero()
    }
}

impl FromStr for ExactNumber {
    type Err = InvalidDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidDecimalError {
                input: s.to_owned(),
            });
        }
        BigDecimal::from_str(trimmed)
            .map(Self)
            .map_err(|_| InvalidDecimalError {
                input: s.to_owned(),
            })
    }
}

impl fmt::Display for ExactNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
