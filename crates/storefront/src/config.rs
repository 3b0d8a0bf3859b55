//! Shopfront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SHOPFRONT_CATALOG_URL` - Product list endpoint (default: `https://fakestoreapi.com/products`)
//! - `SHOPFRONT_DATA_DIR` - Directory for the persisted cart and catalog snapshot (default: `.shopfront`)
//! - `SHOPFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPFRONT_PORT` - Listen port (default: 3000)
//! - `SHOPFRONT_FETCH_TIMEOUT_SECS` - Catalog request timeout (default: 10)
//! - `SHOPFRONT_CACHE_TTL_SECS` - Lifetime of the in-memory catalog snapshot (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shopfront application configuration.
#[derive(Debug, Clone)]
pub struct ShopfrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Catalog source configuration
    pub catalog: CatalogConfig,
    /// Directory holding durable slots
    pub data_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Catalog source configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Endpoint returning the JSON product list
    pub url: Url,
    /// Per-request timeout
    pub fetch_timeout: Duration,
    /// Lifetime of the in-memory snapshot copy
    pub cache_ttl: Duration,
}

impl ShopfrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: parse_env_or_default("SHOPFRONT_HOST", "127.0.0.1")?,
            port: parse_env_or_default("SHOPFRONT_PORT", "3000")?,
            catalog: CatalogConfig::from_env()?,
            data_dir: PathBuf::from(get_env_or_default("SHOPFRONT_DATA_DIR", ".shopfront")),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = parse_catalog_url(&get_env_or_default(
            "SHOPFRONT_CATALOG_URL",
            DEFAULT_CATALOG_URL,
        ))?;

        Ok(Self {
            url,
            fetch_timeout: Duration::from_secs(parse_env_or_default(
                "SHOPFRONT_FETCH_TIMEOUT_SECS",
                "10",
            )?),
            cache_ttl: Duration::from_secs(parse_env_or_default(
                "SHOPFRONT_CACHE_TTL_SECS",
                "300",
            )?),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate the catalog endpoint: must be an absolute http(s) URL.
fn parse_catalog_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("SHOPFRONT_CATALOG_URL".to_string(), reason);

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_url_accepts_http_and_https() {
        assert!(parse_catalog_url("https://fakestoreapi.com/products").is_ok());
        assert!(parse_catalog_url("http://localhost:8080/products").is_ok());
    }

    #[test]
    fn test_catalog_url_rejects_other_schemes() {
        let err = parse_catalog_url("file:///tmp/products.json").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref var, _) if var == "SHOPFRONT_CATALOG_URL"));
        assert!(parse_catalog_url("not a url").is_err());
    }

    #[test]
    fn test_parse_default_used_when_unset() {
        let port: u16 = parse_env_or_default("SHOPFRONT_TEST_UNSET_PORT", "3000").unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn test_parse_reports_variable_name() {
        let err = parse_env_or_default::<u16>("SHOPFRONT_TEST_UNSET_PORT", "not-a-port").unwrap_err();
        assert!(err.to_string().contains("SHOPFRONT_TEST_UNSET_PORT"));
    }

    #[test]
    fn test_socket_addr() {
        let config = ShopfrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            catalog: CatalogConfig {
                url: Url::parse(DEFAULT_CATALOG_URL).unwrap(),
                fetch_timeout: Duration::from_secs(10),
                cache_ttl: Duration::from_secs(300),
            },
            data_dir: PathBuf::from(".shopfront"),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
