//! Cart commands.
//!
//! The cart lives in the data directory, so changes made here show up in
//! the server after its next start and vice versa.

use std::sync::Arc;

use shopfront::cart::CartState;
use shopfront::store::SlotStore;
use shopfront_core::ProductId;

use super::{CliError, Context, report};

/// Print the persisted cart.
pub fn show(ctx: &Context) {
    print_cart(ctx.session().cart());
}

/// Add one unit of `product_id`.
///
/// The catalog is loaded first, since only products in it can be added
/// (unless already in the cart).
///
/// # Errors
///
/// Returns an error if no catalog is available or the product is unknown.
pub async fn add(ctx: &Context, product_id: ProductId) -> Result<(), CliError> {
    let mut session = ctx.loaded_session().await?;
    let effects = session.on_add_to_cart(product_id)?;
    report(&effects)?;
    print_cart(session.cart());
    Ok(())
}

/// Remove the line for `product_id`, if present.
pub fn remove(ctx: &Context, product_id: ProductId) {
    let mut session = ctx.session();
    let effects = session.on_remove_from_cart(product_id);
    // Only carries warnings here
    let _ = report(&effects);
    print_cart(session.cart());
}

/// Empty the cart.
pub fn clear(ctx: &Context) {
    let mut session = ctx.session();
    let effects = session.on_clear_cart();
    let _ = report(&effects);
    print_cart(session.cart());
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &CartState<Arc<dyn SlotStore>>) {
    if cart.is_empty() {
        println!("Cart is empty.");
    }
    for entry in cart.entries() {
        println!(
            "{:>4}  {:>3} x {:>9}  {:>10}  {}",
            entry.product_id,
            entry.quantity,
            entry.price.display(),
            entry.line_total().display(),
            entry.title,
        );
    }
    println!(
        "{} items, subtotal {}",
        cart.total_item_count(),
        cart.total_price().display()
    );
}
