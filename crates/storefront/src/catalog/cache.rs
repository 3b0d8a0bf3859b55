//! Last-known-good catalog snapshot.
//!
//! The raw payload of the last successful fetch is kept in a `moka` cache in
//! front of a durable slot, so the snapshot survives restarts while repeated
//! fallbacks within a session stay in memory.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::store::{SlotStore, StoreError};

/// Slot holding the catalog snapshot.
pub const CATALOG_CACHE_KEY: &str = "catalog:products";

/// A cached raw catalog payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// When the payload was stored. `None` for snapshots written without an
    /// envelope (a bare payload placed in the slot).
    pub stored_at: Option<DateTime<Utc>>,
    /// The payload exactly as the source returned it.
    pub payload: String,
}

impl CatalogSnapshot {
    fn now(payload: String) -> Self {
        Self {
            stored_at: Some(Utc::now()),
            payload,
        }
    }

    /// Decode slot contents, accepting either an envelope or a bare payload.
    fn decode(raw: String) -> Self {
        match serde_json::from_str::<Self>(&raw) {
            Ok(snapshot) => snapshot,
            Err(_) => Self {
                stored_at: None,
                payload: raw,
            },
        }
    }
}

/// Catalog snapshot cache.
///
/// Cheaply cloneable; clones share the same memory cache and durable store.
#[derive(Clone)]
pub struct CatalogCache {
    inner: Arc<CatalogCacheInner>,
}

struct CatalogCacheInner {
    memory: Cache<String, Arc<CatalogSnapshot>>,
    durable: Arc<dyn SlotStore>,
    /// Latest detached write.
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl CatalogCache {
    /// Create a cache over `durable`, keeping the in-memory copy for `ttl`.
    #[must_use]
    pub fn new(durable: Arc<dyn SlotStore>, ttl: Duration) -> Self {
        let memory = Cache::builder().max_capacity(1).time_to_live(ttl).build();

        Self {
            inner: Arc::new(CatalogCacheInner {
                memory,
                durable,
                pending: Mutex::new(None),
            }),
        }
    }

    /// Read the snapshot, or `None` if nothing usable is cached.
    ///
    /// Durable read failures are logged and reported as a miss.
    #[instrument(skip(self))]
    pub async fn get(&self) -> Option<Arc<CatalogSnapshot>> {
        if let Some(snapshot) = self.inner.memory.get(CATALOG_CACHE_KEY).await {
            debug!("Memory cache hit for catalog snapshot");
            return Some(snapshot);
        }

        let durable = Arc::clone(&self.inner.durable);
        let raw = match tokio::task::spawn_blocking(move || durable.get(CATALOG_CACHE_KEY)).await {
            Ok(Ok(Some(raw))) => raw,
            Ok(Ok(None)) => {
                debug!("No catalog snapshot stored");
                return None;
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to read catalog snapshot");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Catalog snapshot read task failed");
                return None;
            }
        };

        let snapshot = Arc::new(CatalogSnapshot::decode(raw));
        self.inner
            .memory
            .insert(CATALOG_CACHE_KEY.to_string(), Arc::clone(&snapshot))
            .await;
        Some(snapshot)
    }

    /// Store `payload` as the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the durable write fails. The in-memory copy is
    /// updated regardless.
    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    pub async fn put(&self, payload: String) -> Result<(), StoreError> {
        let snapshot = Arc::new(CatalogSnapshot::now(payload));
        self.inner
            .memory
            .insert(CATALOG_CACHE_KEY.to_string(), Arc::clone(&snapshot))
            .await;

        let encoded = serde_json::to_string(snapshot.as_ref())?;
        let durable = Arc::clone(&self.inner.durable);
        tokio::task::spawn_blocking(move || durable.set(CATALOG_CACHE_KEY, &encoded))
            .await
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))??;

        debug!("Catalog snapshot stored");
        Ok(())
    }

    /// Store `payload` on a detached task. Failures are logged only.
    pub fn put_detached(&self, payload: String) {
        let cache = self.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = cache.put(payload).await {
                warn!(error = %e, "Failed to refresh catalog snapshot");
            }
        });
        if let Ok(mut pending) = self.inner.pending.lock() {
            *pending = Some(handle);
        }
    }

    /// Wait for the latest detached write to finish.
    ///
    /// Short-lived processes call this before exiting, since the runtime
    /// drops unfinished tasks on shutdown.
    pub async fn flush(&self) {
        let handle = self.inner.pending.lock().ok().and_then(|mut p| p.take());
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            warn!(error = %e, "Catalog snapshot write task failed");
        }
    }

    /// Drop the in-memory copy, forcing the next read to hit the durable slot.
    pub async fn invalidate_memory(&self) {
        self.inner.memory.invalidate_all();
        self.inner.memory.run_pending_tasks().await;
    }
}
