//! Per-client session: catalog, cart, and view, driven by explicit commands.
//!
//! Each handler applies one user action and returns the effects the
//! presentation layer should carry out. Handlers are synchronous, so a single
//! add or remove is never observed half-applied.
//!
//! The session does not own the catalog loader. Callers that own the session
//! outright use [`Session::reload_catalog`]; the server runs the loader
//! outside its session lock (so other commands keep flowing while a fetch is
//! pending) and hands the outcome to [`Session::apply_loaded`] or
//! [`Session::on_load_failed`]. Results from a load that started before the
//! one already applied are ignored, so a slow reload never rolls the catalog
//! back.

use chrono::{DateTime, Utc};
use shopfront_core::{CategoryFilter, Product, ProductId, SortKey};
use tracing::{debug, info, warn};

use crate::cart::{CartError, CartState, CartUpdate};
use crate::catalog::{
    CatalogError, CatalogLoader, CatalogOrigin, CatalogSource, CatalogState, LoadedCatalog,
};
use crate::store::SlotStore;

/// Current filter and sort selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub category: CategoryFilter,
    pub sort: SortKey,
}

/// Something the presentation layer should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Show these products in the grid.
    RenderProducts(Vec<Product>),
    /// The projection is empty; show the empty-state message.
    RenderEmptyState,
    /// Refresh the category controls.
    RenderCategories(Vec<String>),
    /// Refresh the cart panel.
    RenderCart,
    /// Update the cart badge to this item count.
    UpdateCartBadge(u32),
    /// The catalog shown is a cached copy.
    ShowOfflineNotice { stored_at: Option<DateTime<Utc>> },
    /// No catalog could be loaded; the current one (if any) stays.
    ShowUnavailable,
    /// Non-fatal problem worth telling the user about.
    Warn(String),
}

/// A client session.
#[derive(Debug)]
pub struct Session<S> {
    catalog: CatalogState,
    cart: CartState<S>,
    view: View,
    applied_sequence: u64,
}

impl<S: SlotStore> Session<S> {
    /// Start a session with an empty catalog and the cart persisted in `store`.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            catalog: CatalogState::new(),
            cart: CartState::load(store),
            view: View::default(),
            applied_sequence: 0,
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartState<S> {
        &self.cart
    }

    #[must_use]
    pub const fn view(&self) -> &View {
        &self.view
    }

    /// Projection of the catalog under the current view.
    #[must_use]
    pub fn current_products(&self) -> Vec<Product> {
        self.catalog.project(&self.view.category, self.view.sort)
    }

    /// Install a freshly loaded catalog and re-render.
    ///
    /// A result older than the one already applied is dropped with no
    /// effects.
    pub fn apply_loaded(&mut self, loaded: LoadedCatalog) -> Vec<Effect> {
        if loaded.sequence < self.applied_sequence {
            debug!(
                sequence = loaded.sequence,
                applied = self.applied_sequence,
                "Ignoring stale catalog load"
            );
            return Vec::new();
        }
        self.applied_sequence = loaded.sequence;
        self.catalog.replace(loaded.catalog);
        info!(
            products = self.catalog.len(),
            origin = ?loaded.origin,
            "Catalog applied to session"
        );

        let mut effects = vec![Effect::RenderCategories(
            self.catalog.categories().to_vec(),
        )];
        if let CatalogOrigin::Cache { stored_at } = loaded.origin {
            effects.push(Effect::ShowOfflineNotice { stored_at });
        }
        effects.push(self.render_products());
        effects
    }

    /// Record a failed load. The current catalog is left untouched.
    pub fn on_load_failed(&self, error: &CatalogError) -> Vec<Effect> {
        match error {
            CatalogError::CacheMiss { .. } => {
                warn!(
                    error = %error,
                    products = self.catalog.len(),
                    "Catalog unavailable, keeping current catalog"
                );
                vec![Effect::ShowUnavailable]
            }
            // The load already running will apply its own result
            CatalogError::LoadInProgress => Vec::new(),
        }
    }

    /// Load the catalog and apply the outcome.
    pub async fn reload_catalog<Src: CatalogSource>(
        &mut self,
        loader: &CatalogLoader<Src>,
    ) -> Vec<Effect> {
        match loader.load().await {
            Ok(loaded) => self.apply_loaded(loaded),
            Err(e) => self.on_load_failed(&e),
        }
    }

    pub fn on_filter_change(&mut self, category: CategoryFilter) -> Vec<Effect> {
        self.view.category = category;
        vec![self.render_products()]
    }

    pub fn on_sort_change(&mut self, sort: SortKey) -> Vec<Effect> {
        self.view.sort = sort;
        vec![self.render_products()]
    }

    /// Add one unit of a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product is neither in the
    /// current catalog nor already in the cart.
    pub fn on_add_to_cart(&mut self, product_id: ProductId) -> Result<Vec<Effect>, CartError> {
        let snapshot = self.catalog.product(product_id);
        let update = self.cart.add_item(product_id, snapshot)?;
        Ok(cart_effects(update))
    }

    pub fn on_remove_from_cart(&mut self, product_id: ProductId) -> Vec<Effect> {
        cart_effects(self.cart.remove_item(product_id))
    }

    pub fn on_decrement(&mut self, product_id: ProductId) -> Vec<Effect> {
        cart_effects(self.cart.decrement_item(product_id))
    }

    pub fn on_clear_cart(&mut self) -> Vec<Effect> {
        cart_effects(self.cart.clear())
    }

    fn render_products(&self) -> Effect {
        let products = self.current_products();
        if products.is_empty() {
            Effect::RenderEmptyState
        } else {
            Effect::RenderProducts(products)
        }
    }
}

fn cart_effects(update: CartUpdate) -> Vec<Effect> {
    let mut effects = vec![
        Effect::UpdateCartBadge(update.item_count),
        Effect::RenderCart,
    ];
    if let Some(e) = update.persist_error {
        warn!(error = %e, "Cart saved in memory only");
        effects.push(Effect::Warn(format!(
            "Your cart could not be saved on this device: {e}"
        )));
    }
    effects
}
