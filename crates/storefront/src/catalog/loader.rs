//! Catalog loading with cache fallback.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use super::cache::CatalogCache;
use super::parse::parse_catalog;
use super::source::CatalogSource;
use super::{Catalog, CatalogError, NetworkError};

/// Where a loaded catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    /// Fresh from the remote source.
    Remote,
    /// Served from the cached snapshot after a failed fetch.
    Cache { stored_at: Option<DateTime<Utc>> },
}

/// Result of a successful [`CatalogLoader::load`].
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub origin: CatalogOrigin,
    /// Start order of the load that produced this result. Later loads from
    /// the same loader carry higher numbers.
    pub sequence: u64,
}

/// Loads the catalog from a source, falling back to the cache on failure.
///
/// One fetch attempt per call, no retries. Overlapping calls are rejected
/// with [`CatalogError::LoadInProgress`].
pub struct CatalogLoader<S> {
    source: S,
    cache: CatalogCache,
    in_flight: AtomicBool,
    sequence: AtomicU64,
}

/// Clears the in-flight flag when a load finishes, however it finishes.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: CatalogSource> CatalogLoader<S> {
    #[must_use]
    pub const fn new(source: S, cache: CatalogCache) -> Self {
        Self {
            source,
            cache,
            in_flight: AtomicBool::new(false),
            sequence: AtomicU64::new(0),
        }
    }

    /// The snapshot cache used for fallback.
    #[must_use]
    pub const fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// Whether a load is currently pending.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Load the catalog.
    ///
    /// On a successful fetch the raw payload is written to the cache on a
    /// detached task. On a failed fetch the cached snapshot is returned
    /// instead and the cache is left as is.
    ///
    /// # Errors
    ///
    /// - `CatalogError::CacheMiss` if the fetch failed and no usable snapshot
    ///   is cached
    /// - `CatalogError::LoadInProgress` if another load is pending
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<LoadedCatalog, CatalogError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            warn!("Catalog load rejected, another load is in flight");
            return Err(CatalogError::LoadInProgress);
        };
        let sequence = self.sequence.fetch_add(1, Ordering::AcqRel) + 1;

        let network_error = match self.fetch_remote().await {
            Ok((catalog, raw)) => {
                self.cache.put_detached(raw);
                info!(
                    products = catalog.len(),
                    categories = catalog.categories().len(),
                    "Catalog loaded from remote source"
                );
                return Ok(LoadedCatalog {
                    catalog,
                    origin: CatalogOrigin::Remote,
                    sequence,
                });
            }
            Err(e) => e,
        };

        warn!(error = %network_error, "Catalog fetch failed, falling back to cache");

        let Some(snapshot) = self.cache.get().await else {
            return Err(CatalogError::CacheMiss {
                source: network_error,
            });
        };

        match parse_catalog(&snapshot.payload) {
            Ok(catalog) => {
                info!(
                    products = catalog.len(),
                    stored_at = ?snapshot.stored_at,
                    "Catalog loaded from cache"
                );
                Ok(LoadedCatalog {
                    catalog,
                    origin: CatalogOrigin::Cache {
                        stored_at: snapshot.stored_at,
                    },
                    sequence,
                })
            }
            Err(e) => {
                warn!(error = %e, "Cached catalog snapshot is corrupt, ignoring it");
                Err(CatalogError::CacheMiss {
                    source: network_error,
                })
            }
        }
    }

    async fn fetch_remote(&self) -> Result<(Catalog, String), NetworkError> {
        let raw = self.source.fetch().await?;
        let catalog = parse_catalog(&raw)?;
        Ok((catalog, raw))
    }
}
