//! Remote catalog sources.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, instrument};
use url::Url;

use super::NetworkError;

/// A place the raw catalog payload can be fetched from.
///
/// Implementations perform a single attempt per call; retry policy belongs to
/// the caller.
pub trait CatalogSource: Send + Sync {
    /// Fetch the raw payload.
    fn fetch(&self) -> impl Future<Output = Result<String, NetworkError>> + Send;
}

/// Fetches the catalog with an HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpCatalogSource {
    /// Create a source for `endpoint` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Http` if the HTTP client cannot be built.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

impl CatalogSource for HttpCatalogSource {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch(&self) -> Result<String, NetworkError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog endpoint returned non-success status"
            );
            return Err(NetworkError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Catalog payload received");
        Ok(body)
    }
}
