//! HTTP route handlers for the swatch relay.
//!
//! # Route Structure
//!
//! ```text
//! GET     /health        - Liveness check
//! GET     /swatches      - Full swatch collection, images resolved
//! GET     /api/swatches  - Same handler, prefixed deployment path
//! OPTIONS /swatches      - CORS preflight (answered by the CORS layer)
//! ```

pub mod swatches;

use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Create the swatch routes router.
///
/// Both paths serve the same handler; storefront deployments have mounted
/// the endpoint bare and under `/api`.
pub fn swatch_routes() -> Router<AppState> {
    Router::new()
        .route("/swatches", get(swatches::list))
        .route("/api/swatches", get(swatches::list))
        .layer(cors_layer())
}

/// Permissive CORS so storefront browsers can call the relay directly.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Create the complete application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(swatch_routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check upstream access.
async fn health() -> &'static str {
    "ok"
}
