//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::cart::CartError;
use crate::catalog::CatalogError;

/// Application-level error type for the HTTP API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart mutation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(CatalogError::CacheMiss { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Catalog(CatalogError::LoadInProgress) => StatusCode::CONFLICT,
            Self::Cart(CartError::ProductNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Cart(CartError::QuantityOverflow(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Catalog(CatalogError::CacheMiss { .. }) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Catalog(CatalogError::CacheMiss { .. }) => {
                "The catalog is unavailable right now. Please try again later.".to_string()
            }
            Self::Catalog(e) => e.to_string(),
            Self::Cart(e) => e.to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Internal(_) => "Internal server error".to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use shopfront_core::ProductId;

    use super::*;
    use crate::catalog::NetworkError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid sort".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid sort");

        let err = AppError::from(CartError::ProductNotFound(ProductId::new(7)));
        assert_eq!(
            err.to_string(),
            "Cart error: product 7 is not in the current catalog"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Catalog(CatalogError::CacheMiss {
                source: NetworkError::Status(502),
            })),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Catalog(CatalogError::LoadInProgress)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::ProductNotFound(ProductId::new(1)))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
