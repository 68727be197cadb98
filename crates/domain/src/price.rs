//! Prices and their conversion to minor currency units.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A finite, non-negative price in major currency units (e.g. dollars).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    /// Validate and wrap a raw amount.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPrice`] when `value` is NaN,
    /// infinite, or negative.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidPrice);
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert to minor units (cents) for charging, rounding to the nearest unit.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveAmount`] when the rounded amount
    /// is zero.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_minor_units(self) -> Result<u64, ValidationError> {
        // `self.0` is finite and non-negative, so the cast only saturates.
        let minor = (self.0 * 100.0).round() as u64;
        if minor == 0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        Ok(minor)
    }
}

impl TryFrom<f64> for Price {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.0
    }
}
