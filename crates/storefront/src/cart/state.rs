//! Cart state with write-through persistence.

use shopfront_core::{CartEntry, Price, Product, ProductId};
use tracing::{debug, instrument, warn};

use super::CartError;
use crate::store::{SlotStore, StoreError};

/// Slot holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Outcome of a cart mutation.
///
/// The in-memory change always takes effect. `persist_error` carries the
/// reason if the write-through to the store failed.
#[derive(Debug)]
#[must_use]
pub struct CartUpdate {
    pub item_count: u32,
    pub persist_error: Option<StoreError>,
}

impl CartUpdate {
    /// Whether the change reached durable storage.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// The cart: at most one entry per product, each with quantity >= 1.
///
/// Every mutation is applied in memory and then the whole cart is written to
/// the store under [`CART_KEY`].
#[derive(Debug)]
pub struct CartState<S> {
    entries: Vec<CartEntry>,
    item_count: u32,
    store: S,
}

impl<S: SlotStore> CartState<S> {
    /// Load the cart from `store`.
    ///
    /// A missing slot yields an empty cart. Unreadable or invalid contents
    /// are logged and also yield an empty cart.
    #[instrument(skip(store))]
    pub fn load(store: S) -> Self {
        let entries = match store.get(CART_KEY) {
            Ok(Some(raw)) => decode_entries(&raw).unwrap_or_else(|reason| {
                warn!(reason, "Discarding corrupt persisted cart");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cart, starting empty");
                Vec::new()
            }
        };

        let mut cart = Self {
            entries,
            item_count: 0,
            store,
        };
        cart.recount();
        debug!(
            entries = cart.entries.len(),
            items = cart.item_count,
            "Cart loaded"
        );
        cart
    }

    /// Add one unit of a product.
    ///
    /// An existing entry has its quantity incremented and `snapshot` is not
    /// consulted. Otherwise a new entry is created from `snapshot`, which
    /// must be the current catalog's product for `product_id`.
    ///
    /// # Errors
    ///
    /// - `CartError::ProductNotFound` if a new entry is needed and no
    ///   matching snapshot was supplied
    /// - `CartError::QuantityOverflow` if the quantity cannot grow
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        snapshot: Option<&Product>,
    ) -> Result<CartUpdate, CartError> {
        if let Some(entry) = self.entry_mut(product_id) {
            entry.quantity = entry
                .quantity
                .checked_add(1)
                .ok_or(CartError::QuantityOverflow(product_id))?;
        } else {
            let product = snapshot
                .filter(|p| p.id == product_id)
                .ok_or(CartError::ProductNotFound(product_id))?;
            self.entries.push(CartEntry::from_product(product));
        }

        Ok(self.commit())
    }

    /// Remove a product's entry entirely. Absent products are a no-op.
    pub fn remove_item(&mut self, product_id: ProductId) -> CartUpdate {
        self.entries.retain(|e| e.product_id != product_id);
        self.commit()
    }

    /// Take one unit off a product's entry, removing it at zero. Absent
    /// products are a no-op.
    pub fn decrement_item(&mut self, product_id: ProductId) -> CartUpdate {
        if let Some(entry) = self.entry_mut(product_id) {
            entry.quantity = entry.quantity.saturating_sub(1);
        }
        self.entries.retain(|e| e.quantity > 0);
        self.commit()
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> CartUpdate {
        self.entries.clear();
        self.commit()
    }

    /// Entries in the order they were first added.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn entry(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of quantities across all entries.
    #[must_use]
    pub const fn total_item_count(&self) -> u32 {
        self.item_count
    }

    /// Sum of price times quantity, unrounded.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn entry_mut(&mut self, product_id: ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| e.product_id == product_id)
    }

    fn recount(&mut self) {
        self.item_count = self
            .entries
            .iter()
            .fold(0u32, |total, e| total.saturating_add(e.quantity));
    }

    fn commit(&mut self) -> CartUpdate {
        self.recount();
        let persist_error = self.persist().err();
        if let Some(e) = &persist_error {
            warn!(error = %e, "Cart change not persisted");
        }
        CartUpdate {
            item_count: self.item_count,
            persist_error,
        }
    }

    fn persist(&self) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(&self.entries)?;
        self.store.set(CART_KEY, &encoded)
    }
}

/// Decode and validate persisted entries.
fn decode_entries(raw: &str) -> Result<Vec<CartEntry>, &'static str> {
    let entries: Vec<CartEntry> = serde_json::from_str(raw).map_err(|_| "invalid JSON")?;

    if entries.iter().any(|e| e.quantity == 0) {
        return Err("entry with zero quantity");
    }

    let mut seen = std::collections::HashSet::new();
    if !entries.iter().all(|e| seen.insert(e.product_id)) {
        return Err("duplicate product entries");
    }

    Ok(entries)
}
