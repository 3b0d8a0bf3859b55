//! Cart entry type.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// A line in the cart.
///
/// Title, price and image are copied from the product when it is first added
/// and are not refreshed on later catalog loads. An entry stays displayable
/// even after its product disappears from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product_id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
    /// Always at least 1 while the entry is held in a cart.
    pub quantity: u32,
}

impl CartEntry {
    /// Start a new entry with quantity 1 from a catalog product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: 1,
        }
    }

    /// Price times quantity, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}
