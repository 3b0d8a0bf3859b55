//! In-memory catalog and its projections.

use shopfront_core::{CategoryFilter, Product, ProductId, SortKey};
use tracing::debug;

use super::Catalog;

/// Owns the current catalog.
///
/// Starts empty. Only [`CatalogState::replace`] changes the stored catalog;
/// projections are read-only views.
#[derive(Debug, Default)]
pub struct CatalogState {
    catalog: Catalog,
}

impl CatalogState {
    /// Create an empty catalog state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new catalog.
    pub fn replace(&mut self, catalog: Catalog) {
        debug!(
            previous = self.catalog.len(),
            current = catalog.len(),
            "Replacing catalog"
        );
        self.catalog = catalog;
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        self.catalog.categories()
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.catalog.product(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Filter and sort the catalog.
    ///
    /// All sorts are stable, so products with equal keys keep catalog order.
    /// An empty result is a normal outcome.
    #[must_use]
    pub fn project(&self, filter: &CategoryFilter, sort: SortKey) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .catalog
            .products()
            .iter()
            .filter(|p| filter.matches(&p.category))
            .cloned()
            .collect();

        match sort {
            SortKey::None => {}
            SortKey::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
            SortKey::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
            SortKey::Name => products.sort_by_cached_key(|p| collation_key(&p.title)),
        }

        products
    }
}

/// Case-insensitive ordering key for titles, so "apple" sorts beside "Apple"
/// rather than after "Zebra".
fn collation_key(title: &str) -> String {
    title.trim().to_lowercase()
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::test_support::product;

    fn state() -> CatalogState {
        let mut state = CatalogState::new();
        state.replace(Catalog::new(vec![
            product(1, "Shirt", 2000, "clothing"),
            product(2, "ring", 9900, "jewelery"),
            product(3, "Jacket", 5600, "clothing"),
            product(4, "Monitor", 2000, "electronics"),
            product(5, "Bracelet", 695, "jewelery"),
            product(6, "Anorak", 5600, "clothing"),
        ]));
        state
    }

    fn ids(products: &[Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_project_all_returns_everything_in_order() {
        let state = state();
        let all = state.project(&CategoryFilter::All, SortKey::None);
        assert_eq!(ids(&all), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_project_filters_by_exact_category() {
        let state = state();
        let clothing = state.project(&CategoryFilter::from("clothing"), SortKey::None);
        assert_eq!(ids(&clothing), [1, 3, 6]);
        assert!(clothing.iter().all(|p| p.category == "clothing"));
    }

    #[test]
    fn test_project_unknown_category_is_empty_not_error() {
        let state = state();
        assert!(
            state
                .project(&CategoryFilter::from("garden"), SortKey::Name)
                .is_empty()
        );
    }

    #[test]
    fn test_price_ascending_is_stable() {
        let state = state();
        let sorted = state.project(&CategoryFilter::All, SortKey::PriceAsc);
        // 1 and 4 tie at 20.00, 3 and 6 tie at 56.00: catalog order kept
        assert_eq!(ids(&sorted), [5, 1, 4, 3, 6, 2]);
        assert!(sorted.windows(2).all(|w| w[0].price <= w[1].price));
    }

    #[test]
    fn test_price_descending_is_stable() {
        let state = state();
        let sorted = state.project(&CategoryFilter::All, SortKey::PriceDesc);
        assert_eq!(ids(&sorted), [2, 3, 6, 1, 4, 5]);
        assert!(sorted.windows(2).all(|w| w[0].price >= w[1].price));
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let state = state();
        let sorted = state.project(&CategoryFilter::All, SortKey::Name);
        let titles: Vec<&str> = sorted.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Anorak", "Bracelet", "Jacket", "Monitor", "ring", "Shirt"]
        );
    }

    #[test]
    fn test_project_does_not_mutate_catalog() {
        let state = state();
        let _ = state.project(&CategoryFilter::from("jewelery"), SortKey::PriceDesc);
        assert_eq!(state.len(), 6);
        assert_eq!(
            ids(&state.project(&CategoryFilter::All, SortKey::None)),
            [1, 2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn test_replace_recomputes_categories() {
        let mut state = state();
        state.replace(Catalog::new(vec![product(9, "Lamp", 1500, "home")]));
        assert_eq!(state.categories(), ["home"]);
        assert!(state.product(ProductId::new(1)).is_none());
    }
}
