//! HTTP route handlers for the shopfront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Health check
//!
//! # Catalog
//! GET    /api/products?category=&sort=    - Filtered, sorted product list
//! GET    /api/categories                  - Distinct categories
//! POST   /api/catalog/reload              - Fetch again (falls back to the cache)
//!
//! # Cart
//! GET    /api/cart                        - Cart contents and totals
//! POST   /api/cart/items                  - Add one unit ({"product_id": 1})
//! POST   /api/cart/items/{id}/decrement   - Remove one unit
//! DELETE /api/cart/items/{id}             - Remove the line
//! DELETE /api/cart                        - Empty the cart
//! ```

pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/categories", get(products::categories))
        .route("/catalog/reload", post(products::reload))
        .route("/cart", get(cart::show).delete(cart::clear))
        .route("/cart/items", post(cart::add))
        .route("/cart/items/{id}", delete(cart::remove))
        .route("/cart/items/{id}/decrement", post(cart::decrement))
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}
