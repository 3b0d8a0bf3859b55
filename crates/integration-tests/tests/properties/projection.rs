//! Property tests for filtering and sorting the catalog.

use proptest::prelude::*;

use shopfront::catalog::{Catalog, CatalogState};
use shopfront_core::{CategoryFilter, Product, SortKey};

use super::product;

const CATEGORIES: [&str; 3] = ["kitchen", "garden", "textiles"];

/// Titles that collide once case and surrounding space are ignored.
const TITLES: [&str; 7] = ["apple", "Apple", " apple", "Banana", "banana", "cherry", "Date"];

/// Prices drawn from a short list so equal keys are common.
const PRICES: [u32; 4] = [0, 499, 999, 2500];

fn catalog_state() -> impl Strategy<Value = CatalogState> {
    proptest::collection::vec(
        (
            proptest::sample::select(TITLES.to_vec()),
            proptest::sample::select(PRICES.to_vec()),
            proptest::sample::select(CATEGORIES.to_vec()),
        ),
        0..16,
    )
    .prop_map(|records| {
        let products = (1..)
            .zip(records)
            .map(|(id, (title, cents, category))| product(id, title, cents, category))
            .collect();
        let mut state = CatalogState::new();
        state.replace(Catalog::new(products));
        state
    })
}

fn filter() -> impl Strategy<Value = CategoryFilter> {
    prop_oneof![
        Just(CategoryFilter::All),
        proptest::sample::select(CATEGORIES.to_vec()).prop_map(CategoryFilter::from),
        Just(CategoryFilter::from("nowhere")),
    ]
}

fn name_key(product: &Product) -> String {
    product.title.trim().to_lowercase()
}

/// Ids ascend with catalog position, so equal keys must keep ascending ids.
fn assert_sorted_stably<K: Ord>(
    products: &[Product],
    key: impl Fn(&Product) -> K,
) -> Result<(), TestCaseError> {
    for pair in products.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let (ka, kb) = (key(a), key(b));
        prop_assert!(ka <= kb, "{} sorted after {}", a.title, b.title);
        if ka == kb {
            prop_assert!(a.id.as_i32() < b.id.as_i32(), "tie between {} and {} reordered", a.id, b.id);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A projection holds exactly the products in the selected
    /// category, whatever the sort.
    #[test]
    fn property_projection_is_filtered_permutation(
        state in catalog_state(),
        filter in filter(),
        sort in prop_oneof![
            Just(SortKey::None),
            Just(SortKey::PriceAsc),
            Just(SortKey::PriceDesc),
            Just(SortKey::Name),
        ],
    ) {
        let expected: Vec<i32> = state
            .catalog()
            .products()
            .iter()
            .filter(|p| filter.matches(&p.category))
            .map(|p| p.id.as_i32())
            .collect();

        let projected = state.project(&filter, sort);
        let mut ids: Vec<i32> = projected.iter().map(|p| p.id.as_i32()).collect();
        if sort == SortKey::None {
            prop_assert_eq!(&ids, &expected);
        }
        ids.sort_unstable();
        prop_assert_eq!(ids, expected);
    }

    /// PROPERTY: Ascending price order is non-decreasing and keeps catalog
    /// order among equal prices.
    #[test]
    fn property_price_ascending_is_stable(state in catalog_state(), filter in filter()) {
        let products = state.project(&filter, SortKey::PriceAsc);
        assert_sorted_stably(&products, |p| p.price)?;
    }

    /// PROPERTY: Descending price order is non-increasing and keeps catalog
    /// order among equal prices.
    #[test]
    fn property_price_descending_is_stable(state in catalog_state(), filter in filter()) {
        let products = state.project(&filter, SortKey::PriceDesc);
        assert_sorted_stably(&products, |p| std::cmp::Reverse(p.price))?;
    }

    /// PROPERTY: Name order ignores case and surrounding space, and titles
    /// that compare equal ("apple", "Apple") keep catalog order.
    #[test]
    fn property_name_order_is_case_insensitive_and_stable(
        state in catalog_state(),
        filter in filter(),
    ) {
        let products = state.project(&filter, SortKey::Name);
        assert_sorted_stably(&products, name_key)?;
    }
}
