//! Product catalog: loading, caching, and projection.
//!
//! # Architecture
//!
//! - [`CatalogSource`] fetches the raw product list (HTTP in production)
//! - [`CatalogCache`] keeps the last good raw payload: `moka` in front of a
//!   durable [`SlotStore`](crate::store::SlotStore)
//! - [`CatalogLoader`] performs one fetch per call and falls back to the cache
//! - [`CatalogState`] owns the current [`Catalog`] and serves projections
//!
//! The remote payload is untrusted. See [`parse_catalog`] for the record
//! policy.

mod cache;
mod loader;
mod parse;
mod source;
mod state;

use std::collections::HashSet;

use shopfront_core::{Product, ProductId};
use thiserror::Error;

pub use cache::{CATALOG_CACHE_KEY, CatalogCache, CatalogSnapshot};
pub use loader::{CatalogLoader, CatalogOrigin, LoadedCatalog};
pub use parse::{ParseError, parse_catalog};
pub use source::{CatalogSource, HttpCatalogSource};
pub use state::CatalogState;

/// Errors fetching the catalog from its remote source.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Request could not be completed (unreachable, timeout, TLS...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("catalog endpoint returned HTTP {0}")]
    Status(u16),

    /// Response body was not a usable product list.
    #[error("malformed catalog payload: {0}")]
    Malformed(#[from] ParseError),
}

/// Errors surfaced by [`CatalogLoader::load`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The fetch failed and no usable cached snapshot exists.
    #[error("catalog unavailable: {source}; no cached copy")]
    CacheMiss {
        #[source]
        source: NetworkError,
    },

    /// Another load is still pending.
    #[error("a catalog load is already in progress")]
    LoadInProgress,
}

/// An ordered product list with its derived category set.
///
/// Every category in [`Catalog::categories`] appears on at least one product
/// and every product's category is listed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<String>,
}

impl Catalog {
    /// Build a catalog, deriving the category set from the products.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let mut seen = HashSet::new();
        let categories = products
            .iter()
            .filter(|p| seen.insert(p.category.as_str()))
            .map(|p| p.category.clone())
            .collect();

        Self {
            products,
            categories,
        }
    }

    /// Products in stored order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Distinct categories, in first-seen order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use shopfront_core::{Price, Product, ProductId, Rating};

    /// Build a product with the fields tests care about.
    pub fn product(id: i32, title: &str, cents: u32, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_cents(cents),
            image: format!("https://img.example/{id}.jpg"),
            category: category.to_string(),
            rating: Rating {
                rate: 4.0,
                count: 10,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::product;
    use super::*;

    #[test]
    fn test_categories_are_distinct_and_complete() {
        let catalog = Catalog::new(vec![
            product(1, "Shirt", 2000, "clothing"),
            product(2, "Ring", 9900, "jewelery"),
            product(3, "Jacket", 5600, "clothing"),
        ]);

        assert_eq!(catalog.categories(), ["clothing", "jewelery"]);
        for p in catalog.products() {
            assert!(catalog.categories().contains(&p.category));
        }
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.categories().is_empty());
        assert!(catalog.product(ProductId::new(1)).is_none());
    }

    #[test]
    fn test_cache_miss_display_includes_cause() {
        let err = CatalogError::CacheMiss {
            source: NetworkError::Status(503),
        };
        assert_eq!(
            err.to_string(),
            "catalog unavailable: catalog endpoint returned HTTP 503; no cached copy"
        );
    }
}
