//! Property tests for cart aggregation and persistence.

use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;

use shopfront::cart::CartState;
use shopfront::catalog::Catalog;
use shopfront::store::{FileStore, MemoryStore};
use shopfront_core::{Price, ProductId};

use super::product;

/// Ids 1..=5 exist in the catalog; 6 never does.
const CATALOG_IDS: i32 = 5;

fn catalog() -> impl Strategy<Value = Catalog> {
    proptest::collection::vec(0u32..50_000, 5).prop_map(|prices| {
        Catalog::new(
            (1..=CATALOG_IDS)
                .zip(prices)
                .map(|(id, cents)| product(id, &format!("Item {id}"), cents, "misc"))
                .collect(),
        )
    })
}

fn adds() -> impl Strategy<Value = Vec<i32>> {
    proptest::collection::vec(1..=CATALOG_IDS, 0..40)
}

#[derive(Debug, Clone)]
enum Command {
    Add(i32),
    Decrement(i32),
    Remove(i32),
}

fn commands() -> impl Strategy<Value = Vec<Command>> {
    let id = 1..=CATALOG_IDS + 1;
    proptest::collection::vec(
        prop_oneof![
            3 => id.clone().prop_map(Command::Add),
            1 => id.clone().prop_map(Command::Decrement),
            1 => id.prop_map(Command::Remove),
        ],
        0..30,
    )
}

fn fill<S: shopfront::store::SlotStore>(cart: &mut CartState<S>, catalog: &Catalog, ids: &[i32]) {
    for &id in ids {
        let id = ProductId::new(id);
        let _ = cart.add_item(id, catalog.product(id)).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Adds aggregate into one entry per id, in first-add order, and
    /// the totals equal the sums over the add sequence.
    #[test]
    fn property_adds_aggregate(catalog in catalog(), ids in adds()) {
        let mut cart = CartState::load(MemoryStore::new());
        fill(&mut cart, &catalog, &ids);

        let mut counts: HashMap<i32, u32> = HashMap::new();
        let mut first_seen = Vec::new();
        for &id in &ids {
            let count = counts.entry(id).or_insert(0);
            if *count == 0 {
                first_seen.push(id);
            }
            *count += 1;
        }

        let entry_ids: Vec<i32> = cart.entries().iter().map(|e| e.product_id.as_i32()).collect();
        prop_assert_eq!(entry_ids, first_seen);
        for entry in cart.entries() {
            prop_assert!(entry.quantity >= 1);
            prop_assert_eq!(entry.quantity, counts[&entry.product_id.as_i32()]);
        }

        prop_assert_eq!(cart.total_item_count() as usize, ids.len());
        let expected: Price = ids
            .iter()
            .map(|&id| catalog.product(ProductId::new(id)).unwrap().price)
            .sum();
        prop_assert_eq!(cart.total_price(), expected);
    }

    /// PROPERTY: Adding a product that is not in the cart and then removing it
    /// leaves entries and totals as they were.
    #[test]
    fn property_add_then_remove_restores_cart(
        catalog in catalog(),
        ids in adds(),
        extra in 1..=CATALOG_IDS,
    ) {
        let ids: Vec<i32> = ids.into_iter().filter(|&id| id != extra).collect();
        let mut cart = CartState::load(MemoryStore::new());
        fill(&mut cart, &catalog, &ids);
        let extra = ProductId::new(extra);
        prop_assert!(cart.entry(extra).is_none());

        let before = cart.entries().to_vec();
        let before_count = cart.total_item_count();
        let before_total = cart.total_price();

        let _ = cart.add_item(extra, catalog.product(extra)).unwrap();
        let _ = cart.remove_item(extra);

        prop_assert_eq!(cart.entries(), before.as_slice());
        prop_assert_eq!(cart.total_item_count(), before_count);
        prop_assert_eq!(cart.total_price(), before_total);
    }

    /// PROPERTY: Adding one unit and taking it back off restores the cart for
    /// any product, whether or not it was already there.
    #[test]
    fn property_add_then_decrement_restores_cart(
        catalog in catalog(),
        ids in adds(),
        extra in 1..=CATALOG_IDS,
    ) {
        let mut cart = CartState::load(MemoryStore::new());
        fill(&mut cart, &catalog, &ids);
        let extra = ProductId::new(extra);

        let before = cart.entries().to_vec();
        let before_total = cart.total_price();

        let _ = cart.add_item(extra, catalog.product(extra)).unwrap();
        let _ = cart.decrement_item(extra);

        prop_assert_eq!(cart.entries(), before.as_slice());
        prop_assert_eq!(cart.total_price(), before_total);
    }

    /// PROPERTY: Whatever the command history, reloading from the same store
    /// yields an identical cart.
    #[test]
    fn property_store_round_trip(catalog in catalog(), commands in commands()) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::new(dir.path()));
        let mut cart = CartState::load(Arc::clone(&store));

        for command in &commands {
            let _ = match *command {
                Command::Add(id) => {
                    let id = ProductId::new(id);
                    // Id 6 is not in the catalog and must be rejected
                    match cart.add_item(id, catalog.product(id)) {
                        Ok(update) => update,
                        Err(_) => {
                            prop_assert!(catalog.product(id).is_none());
                            continue;
                        }
                    }
                }
                Command::Decrement(id) => cart.decrement_item(ProductId::new(id)),
                Command::Remove(id) => cart.remove_item(ProductId::new(id)),
            };
        }

        let reloaded = CartState::load(Arc::clone(&store));
        prop_assert_eq!(reloaded.entries(), cart.entries());
        prop_assert_eq!(reloaded.total_item_count(), cart.total_item_count());
        prop_assert_eq!(reloaded.total_price(), cart.total_price());
    }
}
