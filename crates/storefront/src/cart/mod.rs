//! Client cart, aggregated by product and persisted on every change.

mod state;

use shopfront_core::ProductId;
use thiserror::Error;

pub use state::{CART_KEY, CartState, CartUpdate};

/// Errors rejecting a cart mutation. The cart is unchanged when one is
/// returned.
#[derive(Debug, Error)]
pub enum CartError {
    /// No product snapshot was available for a product not yet in the cart.
    #[error("product {0} is not in the current catalog")]
    ProductNotFound(ProductId),

    /// The entry's quantity cannot grow any further.
    #[error("quantity limit reached for product {0}")]
    QuantityOverflow(ProductId),
}
