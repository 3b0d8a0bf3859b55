//! Command implementations.

pub mod cart;
pub mod catalog;

use std::sync::Arc;

use shopfront::catalog::{CatalogCache, CatalogLoader, HttpCatalogSource, NetworkError};
use shopfront::cart::CartError;
use shopfront::config::{ConfigError, ShopfrontConfig};
use shopfront::session::{Effect, Session};
use shopfront::store::{FileStore, SlotStore};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Could not set up the catalog client: {0}")]
    Client(#[from] NetworkError),

    #[error(transparent)]
    Cart(#[from] CartError),

    /// Neither the source nor the cache produced a catalog.
    #[error("Catalog unavailable and no cached copy")]
    Unavailable,
}

/// Stores and loader built from the environment.
pub struct Context {
    store: Arc<dyn SlotStore>,
    loader: CatalogLoader<HttpCatalogSource>,
}

impl Context {
    /// Build a context from `SHOPFRONT_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn from_env() -> Result<Self, CliError> {
        let config = ShopfrontConfig::from_env()?;
        tracing::debug!(data_dir = %config.data_dir.display(), "Using data directory");

        let store: Arc<dyn SlotStore> = Arc::new(FileStore::new(&config.data_dir));
        let source = HttpCatalogSource::new(config.catalog.url, config.catalog.fetch_timeout)?;
        let cache = CatalogCache::new(Arc::clone(&store), config.catalog.cache_ttl);

        Ok(Self {
            store,
            loader: CatalogLoader::new(source, cache),
        })
    }

    /// A fresh session over the persisted cart.
    fn session(&self) -> Session<Arc<dyn SlotStore>> {
        Session::new(Arc::clone(&self.store))
    }

    /// A session with the catalog loaded.
    async fn loaded_session(&self) -> Result<Session<Arc<dyn SlotStore>>, CliError> {
        let mut session = self.session();
        let effects = session.reload_catalog(&self.loader).await;
        // The snapshot refresh is detached; let it land before we exit
        self.loader.cache().flush().await;
        report(&effects)?;
        Ok(session)
    }
}

/// Print notices carried by `effects`.
///
/// # Errors
///
/// Returns `CliError::Unavailable` if the effects say no catalog could be
/// loaded.
#[allow(clippy::print_stdout)]
fn report(effects: &[Effect]) -> Result<(), CliError> {
    for effect in effects {
        match effect {
            Effect::ShowUnavailable => return Err(CliError::Unavailable),
            Effect::ShowOfflineNotice { stored_at: Some(at) } => {
                println!("Offline: showing the catalog cached at {}", at.to_rfc3339());
            }
            Effect::ShowOfflineNotice { stored_at: None } => {
                println!("Offline: showing a cached catalog");
            }
            Effect::Warn(message) => println!("Warning: {message}"),
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_unavailable_is_error() {
        assert!(matches!(
            report(&[Effect::ShowUnavailable]),
            Err(CliError::Unavailable)
        ));
    }

    #[test]
    fn test_load_failure_reports_unavailable() {
        use shopfront::catalog::CatalogError;
        use shopfront::store::MemoryStore;

        let session = Session::new(MemoryStore::new());
        let effects = session.on_load_failed(&CatalogError::CacheMiss {
            source: NetworkError::Status(503),
        });
        assert!(matches!(report(&effects), Err(CliError::Unavailable)));

        let effects = session.on_load_failed(&CatalogError::LoadInProgress);
        assert!(report(&effects).is_ok());
    }

    #[test]
    fn test_report_ignores_render_effects() {
        assert!(report(&[Effect::RenderCart, Effect::UpdateCartBadge(2)]).is_ok());
        assert!(report(&[Effect::ShowOfflineNotice { stored_at: None }]).is_ok());
    }
}
