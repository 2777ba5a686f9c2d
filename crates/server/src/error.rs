//! Unified request-level error handling.
//!
//! All route handlers return `Result<T, AppError>`; the `IntoResponse` impl
//! turns every failure into a 500 with an `{"error": ...}` JSON body,
//! embedding the raw upstream error array when Shopify rejected a query.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::collector::CollectError;
use crate::shopify::ShopifyError;

/// Application-level error type for the relay.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify credentials were not configured at startup.
    #[error("Missing environment variables")]
    MissingCredentials,

    /// Collection run failed.
    #[error(transparent)]
    Collect(#[from] CollectError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request error");

        // Upstream GraphQL errors pass through verbatim; everything else
        // surfaces as a plain message
        let body = match &self {
            Self::Collect(CollectError::Shopify(ShopifyError::GraphQL(errors))) => {
                serde_json::json!({ "error": errors })
            }
            _ => serde_json::json!({ "error": self.to_string() }),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
