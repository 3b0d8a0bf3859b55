//! Catalog loading against an on-disk snapshot.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use shopfront::catalog::{CATALOG_CACHE_KEY, CatalogError, CatalogOrigin, NetworkError};
use shopfront::store::{FileStore, SlotStore};
use shopfront_core::ProductId;
use shopfront_integration_tests::{
    Reply, SHIRT_PAYLOAD, STORE_PAYLOAD, ScriptedSource, file_store, loader,
};

#[tokio::test]
async fn test_offline_load_uses_cached_shirt() {
    let dir = tempfile::tempdir().unwrap();
    FileStore::new(dir.path())
        .set(CATALOG_CACHE_KEY, SHIRT_PAYLOAD)
        .unwrap();

    let loader = loader(ScriptedSource::offline(), file_store(dir.path()));
    let loaded = loader.load().await.unwrap();

    assert!(matches!(loaded.origin, CatalogOrigin::Cache { .. }));
    let products = loaded.catalog.products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, ProductId::new(1));
    assert_eq!(products[0].title, "Shirt");
}

#[tokio::test]
async fn test_snapshot_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    // First run: online, refreshes the snapshot on disk
    let first = loader(
        ScriptedSource::new([Reply::body(STORE_PAYLOAD)]),
        file_store(dir.path()),
    );
    let loaded = first.load().await.unwrap();
    assert_eq!(loaded.origin, CatalogOrigin::Remote);
    first.cache().flush().await;
    assert!(FileStore::new(dir.path()).slot_path(CATALOG_CACHE_KEY).exists());

    // Second run: offline, fresh memory cache
    let second = loader(ScriptedSource::offline(), file_store(dir.path()));
    let loaded = second.load().await.unwrap();

    let CatalogOrigin::Cache { stored_at } = loaded.origin else {
        panic!("expected cached catalog, got {:?}", loaded.origin);
    };
    assert!(stored_at.is_some());
    assert_eq!(loaded.catalog.len(), 3);
    assert_eq!(loaded.catalog.categories(), ["kitchen", "textiles"]);
}

#[tokio::test]
async fn test_offline_without_snapshot_is_cache_miss() {
    let dir = tempfile::tempdir().unwrap();
    let source = ScriptedSource::new([Reply::Status(500)]);
    let loader = loader(source, file_store(dir.path()));

    let err = loader.load().await.unwrap_err();
    assert!(matches!(
        err,
        CatalogError::CacheMiss {
            source: NetworkError::Status(500)
        }
    ));
}

#[tokio::test]
async fn test_malformed_payload_falls_back_to_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    FileStore::new(dir.path())
        .set(CATALOG_CACHE_KEY, SHIRT_PAYLOAD)
        .unwrap();

    let loader = loader(
        ScriptedSource::new([Reply::body(r#"{"products": []}"#)]),
        file_store(dir.path()),
    );
    let loaded = loader.load().await.unwrap();

    assert!(matches!(loaded.origin, CatalogOrigin::Cache { .. }));
    assert_eq!(loaded.catalog.products()[0].title, "Shirt");
}

#[tokio::test]
async fn test_malformed_payload_does_not_replace_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(dir.path());
    store.set(CATALOG_CACHE_KEY, SHIRT_PAYLOAD).unwrap();

    let loader = loader(ScriptedSource::new([Reply::body("not json")]), store);
    let _ = loader.load().await.unwrap();
    loader.cache().flush().await;

    let raw = FileStore::new(dir.path()).get(CATALOG_CACHE_KEY).unwrap();
    assert_eq!(raw.as_deref(), Some(SHIRT_PAYLOAD));
}

#[tokio::test]
async fn test_corrupt_snapshot_is_cache_miss() {
    let dir = tempfile::tempdir().unwrap();
    FileStore::new(dir.path())
        .set(CATALOG_CACHE_KEY, "{{{")
        .unwrap();

    let loader = loader(ScriptedSource::offline(), file_store(dir.path()));
    assert!(matches!(
        loader.load().await,
        Err(CatalogError::CacheMiss { .. })
    ));
}

#[tokio::test]
async fn test_each_load_fetches_again() {
    let dir = tempfile::tempdir().unwrap();
    let loader = loader(
        ScriptedSource::new([Reply::body(SHIRT_PAYLOAD), Reply::body(STORE_PAYLOAD)]),
        file_store(dir.path()),
    );

    assert_eq!(loader.load().await.unwrap().catalog.len(), 1);
    assert_eq!(loader.load().await.unwrap().catalog.len(), 3);
}
