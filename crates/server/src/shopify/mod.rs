//! Shopify Admin GraphQL API access.
//!
//! # Architecture
//!
//! - Handwritten GraphQL documents ([`queries`]) posted as `{query, variables}`
//!   JSON over `reqwest` - no codegen, the two queries here don't warrant it
//! - Access token sent via the `X-Shopify-Access-Token` header
//! - Read-only integration: metaobject pages and media image lookups, no
//!   mutations

pub mod client;
pub mod metaobjects;
pub mod queries;

pub use client::AdminClient;
pub use metaobjects::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured upstream timeout.
    #[error("Upstream request timed out")]
    Timeout,

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Access token rejected.
    #[error("Access token rejected by the Admin API")]
    Unauthorized,
}

/// A GraphQL error returned by the Shopify Admin API.
///
/// Round-trips through serde so the upstream `errors` array can be embedded
/// verbatim in our own error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<serde_json::Value>,
    /// Vendor extensions (e.g., Shopify error codes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl GraphQLError {
    /// An error carrying only a message, for locally synthesized failures.
    #[must_use]
    pub const fn from_message(message: String) -> Self {
        Self {
            message,
            locations: Vec::new(),
            path: Vec::new(),
            extensions: None,
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .map(|e| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                "(no details)".to_string()
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
