//! Catalog route handlers.
//!
//! Listing reads the session's current projection. Query parameters update
//! the session's filter and sort first, so the selection sticks for later
//! requests.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{CategoryFilter, Price, Product, ProductId, SortKey, StarBreakdown};
use tracing::instrument;

use crate::catalog::CatalogOrigin;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Smallest and largest advertised discount, in percent.
const DISCOUNT_RANGE: std::ops::RangeInclusive<u8> = 5..=40;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    pub price: String,
    pub image: String,
    pub category: String,
    pub rating: f64,
    pub rating_count: u32,
    pub stars: StarBreakdown,
    /// Presentational "was" price; never used for cart arithmetic.
    pub compare_at_price: String,
    pub discount_percent: u8,
}

impl ProductView {
    fn new(product: &Product, rng: &mut impl Rng) -> Self {
        let discount_percent = rng.random_range(DISCOUNT_RANGE);
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price.display(),
            image: product.image.clone(),
            category: product.category.clone(),
            rating: product.rating.rate,
            rating_count: product.rating.count,
            stars: product.rating.stars(),
            compare_at_price: compare_at(product.price, discount_percent).display(),
            discount_percent,
        }
    }
}

/// Price before a `percent` discount that lands on `price`.
fn compare_at(price: Price, percent: u8) -> Price {
    let factor = Decimal::ONE - Decimal::new(i64::from(percent), 2);
    price
        .amount()
        .checked_div(factor)
        .and_then(|amount| Price::new(amount).ok())
        .unwrap_or(price)
}

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductListView {
    pub category: String,
    pub sort: SortKey,
    /// True when nothing matches; clients show the empty-state message.
    pub empty: bool,
    pub products: Vec<ProductView>,
}

/// Category listing response.
#[derive(Debug, Serialize)]
pub struct CategoriesView {
    pub categories: Vec<String>,
}

/// Catalog reload response.
#[derive(Debug, Serialize)]
pub struct ReloadView {
    /// `remote` or `cache`.
    pub source: &'static str,
    pub stored_at: Option<DateTime<Utc>>,
    pub products: usize,
    pub categories: Vec<String>,
}

/// List products under the session's filter and sort.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductListView>> {
    let sort = query
        .sort
        .as_deref()
        .map(str::parse::<SortKey>)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut session = state.session().lock().await;
    if let Some(category) = query.category.as_deref() {
        let _ = session.on_filter_change(CategoryFilter::from(category));
    }
    if let Some(sort) = sort {
        let _ = session.on_sort_change(sort);
    }

    let products = session.current_products();
    let view = session.view().clone();
    drop(session);

    let mut rng = rand::rng();
    Ok(Json(ProductListView {
        category: view.category.to_string(),
        sort: view.sort,
        empty: products.is_empty(),
        products: products
            .iter()
            .map(|p| ProductView::new(p, &mut rng))
            .collect(),
    }))
}

/// Distinct categories of the loaded catalog.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<CategoriesView> {
    let session = state.session().lock().await;
    Json(CategoriesView {
        categories: session.catalog().categories().to_vec(),
    })
}

/// Fetch the catalog again, falling back to the cached copy.
///
/// The fetch runs without holding the session, so cart requests keep being
/// served while it is pending.
#[instrument(skip(state))]
pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadView>> {
    let loaded = match state.loader().load().await {
        Ok(loaded) => loaded,
        Err(e) => {
            let _ = state.session().lock().await.on_load_failed(&e);
            return Err(e.into());
        }
    };
    let (source, stored_at) = match loaded.origin {
        CatalogOrigin::Remote => ("remote", None),
        CatalogOrigin::Cache { stored_at } => ("cache", stored_at),
    };

    let mut session = state.session().lock().await;
    let _ = session.apply_loaded(loaded);

    Ok(Json(ReloadView {
        source,
        stored_at,
        products: session.catalog().len(),
        categories: session.catalog().categories().to_vec(),
    }))
}
