//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::error;

use crate::catalog::{CatalogCache, CatalogLoader, HttpCatalogSource, NetworkError};
use crate::config::ShopfrontConfig;
use crate::error::AppError;
use crate::session::Session;
use crate::store::{FileStore, SlotStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The session sits behind a
/// mutex so commands are applied one at a time; the loader does not, so a
/// pending catalog fetch never blocks cart commands.
///
/// Commands that write through to the store go through
/// [`AppState::run_session`], which runs them on the blocking pool.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ShopfrontConfig,
    loader: CatalogLoader<HttpCatalogSource>,
    session: Arc<Mutex<SharedSession>>,
}

/// The session type the server shares between requests.
pub type SharedSession = Session<Arc<dyn SlotStore>>;

impl AppState {
    /// Create a new application state backed by files under the configured
    /// data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client for the catalog source cannot be
    /// built.
    pub fn new(config: ShopfrontConfig) -> Result<Self, NetworkError> {
        let store: Arc<dyn SlotStore> = Arc::new(FileStore::new(&config.data_dir));
        let source = HttpCatalogSource::new(config.catalog.url.clone(), config.catalog.fetch_timeout)?;
        Ok(Self::with_parts(config, source, store))
    }

    /// Create application state from explicit parts.
    #[must_use]
    pub fn with_parts(
        config: ShopfrontConfig,
        source: HttpCatalogSource,
        store: Arc<dyn SlotStore>,
    ) -> Self {
        let cache = CatalogCache::new(Arc::clone(&store), config.catalog.cache_ttl);
        let loader = CatalogLoader::new(source, cache);
        let session = Arc::new(Mutex::new(Session::new(store)));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                loader,
                session,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ShopfrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog loader.
    #[must_use]
    pub fn loader(&self) -> &CatalogLoader<HttpCatalogSource> {
        &self.inner.loader
    }

    /// Get a reference to the session mutex.
    #[must_use]
    pub fn session(&self) -> &Mutex<SharedSession> {
        &self.inner.session
    }

    /// Run `command` against the locked session on the blocking pool.
    ///
    /// The lock is held until `command` returns. Cart commands persist
    /// synchronously, and the file store's writes must stay off the async
    /// workers.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if `command` panicked.
    pub async fn run_session<T, F>(&self, command: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut SharedSession) -> T + Send + 'static,
        T: Send + 'static,
    {
        let mut session = Arc::clone(&self.inner.session).lock_owned().await;
        tokio::task::spawn_blocking(move || command(&mut session))
            .await
            .map_err(|e| {
                error!(error = %e, "Session command failed");
                AppError::Internal(e.to_string())
            })
    }
}
