//! Integration test helpers for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! Tests run against temporary data directories and, for the HTTP tests, a
//! local upstream catalog server bound to an ephemeral port. Nothing
//! reaches the network.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use shopfront::catalog::{CatalogCache, CatalogLoader, CatalogSource, NetworkError};
use shopfront::store::{FileStore, SlotStore};

/// One product, "Shirt", in the upstream wire format.
pub const SHIRT_PAYLOAD: &str = r#"[
  {"id": 1, "title": "Shirt", "price": 20, "category": "clothing",
   "image": "https://img.example/1.jpg", "rating": {"rate": 4.1, "count": 259}}
]"#;

/// Three products across two categories.
pub const STORE_PAYLOAD: &str = r#"[
  {"id": 1, "title": "Mug", "price": 9.99, "category": "kitchen",
   "image": "https://img.example/1.jpg", "rating": {"rate": 3.9, "count": 120}},
  {"id": 2, "title": "Coaster", "price": 5.00, "category": "kitchen",
   "image": "https://img.example/2.jpg", "rating": {"rate": 4.4, "count": 31}},
  {"id": 3, "title": "Apron", "price": 24.50, "category": "textiles",
   "image": "https://img.example/3.jpg"}
]"#;

/// A canned upstream response.
#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Status(u16),
}

impl Reply {
    #[must_use]
    pub fn body(payload: &str) -> Self {
        Self::Body(payload.to_string())
    }
}

/// Catalog source answering from a script, one reply per fetch.
///
/// Once the script runs out every fetch fails with status 503.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    #[must_use]
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A source that is always down.
    #[must_use]
    pub fn offline() -> Self {
        Self::default()
    }

    /// Number of fetches so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CatalogSource for ScriptedSource {
    async fn fetch(&self) -> Result<String, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .unwrap_or(Reply::Status(503));

        match reply {
            Reply::Body(body) => Ok(body),
            Reply::Status(status) => Err(NetworkError::Status(status)),
        }
    }
}

/// File-backed store under `dir`.
#[must_use]
pub fn file_store(dir: &std::path::Path) -> Arc<dyn SlotStore> {
    Arc::new(FileStore::new(dir))
}

/// Loader over `source` with its snapshot kept in `store`.
#[must_use]
pub fn loader<S: CatalogSource>(source: S, store: Arc<dyn SlotStore>) -> CatalogLoader<S> {
    CatalogLoader::new(source, CatalogCache::new(store, Duration::from_secs(60)))
}

/// Serve `router` on an ephemeral local port and return its address.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn serve(router: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });
    addr
}
