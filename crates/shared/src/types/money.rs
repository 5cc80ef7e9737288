//! Money type with exact decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` and fixes amounts to at most
//! two fractional digits at the construction boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Error raised when an external value cannot become a `Money`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The value is not a usable monetary amount.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// A monetary amount with exact decimal arithmetic.
///
/// Construction from external input enforces a non-negative value with at
/// most two fractional digits. Arithmetic on already-constructed values is
/// exact and unchecked for sign, so balance projections can pass through
/// intermediate states and report a negative result instead of panicking.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps an already-trusted decimal (e.g. a value read back from the
    /// ledger). External input goes through [`Money::parse`] instead.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The zero amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Parses a non-negative amount with at most two fractional digits.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` if the string is not a decimal
    /// number, is negative, or carries more than two fractional digits.
    pub fn parse(input: &str) -> Result<Self, MoneyError> {
        let amount = Decimal::from_str(input.trim())
            .map_err(|_| MoneyError::InvalidAmount(format!("not a decimal number: {input:?}")))?;
        Self::from_decimal(amount)
    }

    /// Parses a strictly positive amount with at most two fractional digits.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` if [`Money::parse`] would fail or
    /// the value is zero.
    pub fn parse_positive(input: &str) -> Result<Self, MoneyError> {
        Self::parse(input)?.require_positive()
    }

    /// Validates a decimal as a non-negative two-fractional-digit amount.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` if the value is negative or
    /// carries more than two fractional digits.
    pub fn from_decimal(mut amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() {
            return Err(MoneyError::InvalidAmount(format!(
                "amount must not be negative: {amount}"
            )));
        }
        if amount.normalize().scale() > 2 {
            return Err(MoneyError::InvalidAmount(format!(
                "amount must have at most two fractional digits: {amount}"
            )));
        }
        // Uniform scale 2 so the stored, serialized and displayed forms
        // all agree ("1.500" and "1.5" both become 1.50).
        amount.rescale(2);
        Ok(Self(amount))
    }

    /// Requires the amount to be strictly positive.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` if the amount is zero or negative.
    pub fn require_positive(self) -> Result<Self, MoneyError> {
        if self.0 <= Decimal::ZERO {
            return Err(MoneyError::InvalidAmount(format!(
                "amount must be positive: {}",
                self.0
            )));
        }
        Ok(self)
    }

    /// Returns the inner decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, m| acc + m)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
