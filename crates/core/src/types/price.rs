//! Type-safe price representation using decimal arithmetic.
//!
//! Book prices are quoted in Pakistani rupees and displayed with two
//! decimals and no digit grouping, e.g. `Rs. 1234.00`.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`] from form input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a number.
    #[error("price must be a number")]
    NotANumber,
    /// The input is zero or negative.
    #[error("price must be a positive number")]
    NotPositive,
}

/// A rupee amount.
///
/// Accepts JSON numbers (`19.99`) and numeric strings (`"19.99"`) on the
/// wire, since form-encoded and JSON payloads disagree on the shape.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parse a strictly positive price from user input.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotANumber`] if the trimmed input is not a
    /// decimal number and [`PriceError::NotPositive`] if it is `<= 0`.
    pub fn parse_positive(input: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(input.trim()).map_err(|_| PriceError::NotANumber)?;
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        Ok(Self(amount))
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rs. {:.2}", self.0.round_dp(2))
    }
}
