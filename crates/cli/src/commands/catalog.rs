//! Catalog commands.

use shopfront_core::{CategoryFilter, Product, SortKey};

use super::{CliError, Context};
use shopfront::session::Effect;

/// Load the catalog and print the projection for `category` and `sort`.
///
/// # Errors
///
/// Returns `CliError::Unavailable` if the catalog could neither be fetched
/// nor read from the cache.
pub async fn fetch(ctx: &Context, category: Option<&str>, sort: SortKey) -> Result<(), CliError> {
    let mut session = ctx.loaded_session().await?;

    let _ = session.on_filter_change(CategoryFilter::from(category));
    for effect in session.on_sort_change(sort) {
        match effect {
            Effect::RenderProducts(products) => print_products(&products),
            Effect::RenderEmptyState => print_empty(),
            _ => {}
        }
    }
    Ok(())
}

/// Load the catalog and print its categories.
///
/// # Errors
///
/// Returns `CliError::Unavailable` if the catalog could neither be fetched
/// nor read from the cache.
#[allow(clippy::print_stdout)]
pub async fn categories(ctx: &Context) -> Result<(), CliError> {
    let session = ctx.loaded_session().await?;
    for category in session.catalog().categories() {
        println!("{category}");
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_products(products: &[Product]) {
    for product in products {
        println!("{}", product_line(product));
    }
    println!("{} products", products.len());
}

#[allow(clippy::print_stdout)]
fn print_empty() {
    println!("No products match this filter.");
}

fn product_line(product: &Product) -> String {
    let stars = product.rating.stars();
    format!(
        "{:>4}  {:>9}  {}{}{}  {}  [{}]",
        product.id,
        product.price.display(),
        "*".repeat(usize::from(stars.full)),
        "+".repeat(usize::from(stars.half)),
        ".".repeat(usize::from(stars.empty)),
        product.title,
        product.category,
    )
}
