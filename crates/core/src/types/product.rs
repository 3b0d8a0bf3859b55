//! Catalog product types.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Highest score a rating can carry.
pub const MAX_RATING: f64 = 5.0;

/// A product as listed in the catalog.
///
/// Products are immutable once fetched and replaced wholesale on each
/// successful catalog load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Image URL.
    pub image: String,
    pub category: String,
    pub rating: Rating,
}

/// Aggregate customer rating for a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average score on a 0-5 scale.
    pub rate: f64,
    /// Number of ratings contributing to the average.
    pub count: u32,
}

impl Rating {
    /// Whether the score lies within the 0-5 scale.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.rate.is_finite() && (0.0..=MAX_RATING).contains(&self.rate)
    }

    /// Break the score into full, half and empty stars, rounded to the
    /// nearest half star.
    #[must_use]
    pub fn stars(&self) -> StarBreakdown {
        let clamped = if self.rate.is_finite() {
            self.rate.clamp(0.0, MAX_RATING)
        } else {
            0.0
        };

        // Whole number of half-stars, 0..=10
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let halves = (clamped * 2.0).round() as u8;

        let full = halves / 2;
        let half = halves % 2;
        StarBreakdown {
            full,
            half,
            empty: 5 - full - half,
        }
    }
}

/// Star counts for rendering a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarBreakdown {
    pub full: u8,
    pub half: u8,
    pub empty: u8,
}
