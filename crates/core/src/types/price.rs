//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are kept exact internally. Rounding to cents only happens when a
//! price is formatted for display, so totals never compound rounding error.
//!
//! Unit prices are capped at [`Price::MAX_AMOUNT`]. With `u32` quantities and
//! `i32` product ids a cart total stays below `Decimal::MAX`, and the
//! arithmetic saturates instead of panicking if that ever stops holding.

use std::iter::Sum;
use std::ops::{Add, Mul};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price must not be negative (got {0})")]
    Negative(Decimal),

    #[error("price must not exceed {max} (got {0})", max = Price::MAX_AMOUNT)]
    TooLarge(Decimal),
}

/// A non-negative monetary amount in the store's currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest accepted unit price, in whole currency units.
    pub const MAX_AMOUNT: i64 = 1_000_000_000;

    /// Create a price, rejecting negative amounts and amounts above
    /// [`Self::MAX_AMOUNT`].
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero, or
    /// `PriceError::TooLarge` if it exceeds the cap.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount > Decimal::from(Self::MAX_AMOUNT) {
            return Err(PriceError::TooLarge(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The exact amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount rounded to cents (midpoint away from zero).
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.rounded())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
