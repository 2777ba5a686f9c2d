//! Swatch collection API handler.

use axum::{Json, extract::State};

use crate::error::{AppError, Result};
use crate::shopify::Swatch;
use crate::state::AppState;

/// Serve the full swatch collection as one flat JSON array.
///
/// Every request walks the whole upstream collection; nothing is cached
/// between requests.
///
/// # Errors
///
/// Returns `AppError::MissingCredentials` when Shopify credentials are not
/// configured (no upstream call is made), or the collection error when an
/// upstream call fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Swatch>>> {
    let collector = state.collector().ok_or(AppError::MissingCredentials)?;
    let swatches = collector.collect().await?;
    Ok(Json(swatches))
}
