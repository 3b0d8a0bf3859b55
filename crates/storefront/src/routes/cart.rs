//! Cart route handlers.
//!
//! Every mutation returns the full cart so clients can re-render the panel
//! and the badge from one response. Mutations run through
//! [`AppState::run_session`] since they write the cart to the store.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shopfront_core::{CartEntry, ProductId};
use tracing::instrument;

use crate::cart::CartState;
use crate::error::{AppError, Result};
use crate::session::Effect;
use crate::state::AppState;
use crate::store::SlotStore;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub title: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub subtotal: String,
    /// Set when the cart changed in memory but could not be saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            product_id: entry.product_id,
            title: entry.title.clone(),
            image: entry.image.clone(),
            quantity: entry.quantity,
            price: entry.price.display(),
            line_price: entry.line_total().display(),
        }
    }
}

impl CartView {
    fn new<S: SlotStore>(cart: &CartState<S>, effects: &[Effect]) -> Self {
        Self {
            items: cart.entries().iter().map(CartItemView::from).collect(),
            item_count: cart.total_item_count(),
            subtotal: cart.total_price().display(),
            warning: effects.iter().find_map(|effect| match effect {
                Effect::Warn(message) => Some(message.clone()),
                _ => None,
            }),
        }
    }
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let session = state.session().lock().await;
    Json(CartView::new(session.cart(), &[]))
}

/// Add one unit of a product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let view = state
        .run_session(move |session| {
            let effects = session.on_add_to_cart(request.product_id)?;
            Ok::<_, AppError>(CartView::new(session.cart(), &effects))
        })
        .await??;
    Ok(Json(view))
}

/// Remove one unit of a product; the line goes away at zero.
#[instrument(skip(state))]
pub async fn decrement(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartView>> {
    let view = state
        .run_session(move |session| {
            let effects = session.on_decrement(product_id);
            CartView::new(session.cart(), &effects)
        })
        .await?;
    Ok(Json(view))
}

/// Remove a product line entirely.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartView>> {
    let view = state
        .run_session(move |session| {
            let effects = session.on_remove_from_cart(product_id);
            CartView::new(session.cart(), &effects)
        })
        .await?;
    Ok(Json(view))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartView>> {
    let view = state
        .run_session(|session| {
            let effects = session.on_clear_cart();
            CartView::new(session.cart(), &effects)
        })
        .await?;
    Ok(Json(view))
}
