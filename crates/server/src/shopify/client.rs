//! Shopify Admin GraphQL API client.
//!
//! Posts handwritten query documents and deserializes the `data` payload
//! straight into caller-provided types.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::instrument;

use super::{GraphQLError, ShopifyError};
use crate::config::ShopifyConfig;

/// Client for the Shopify Admin GraphQL API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: secrecy::SecretString,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

impl AdminClient {
    /// Create a new Admin API client for the configured shop.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            inner: Arc::new(AdminClientInner {
                client,
                endpoint: config.graphql_endpoint(),
                access_token: config.access_token.clone(),
            }),
        }
    }

    /// Execute a GraphQL query.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::RateLimited` if Shopify throttles the call.
    /// Returns `ShopifyError::Unauthorized` if the access token is rejected.
    /// Returns `ShopifyError::Timeout` if the configured deadline passes.
    /// Returns `ShopifyError::GraphQL` if the query returns errors.
    /// Returns `ShopifyError::Http` on other network failures.
    #[instrument(skip(self, query, variables))]
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ShopifyError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(
                "X-Shopify-Access-Token",
                self.inner.access_token.expose_secret(),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Check for unauthorized
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ShopifyError::Unauthorized);
        }

        // Get response body as text first for better error diagnostics; the
        // deadline can also fire mid-body, not just before the headers
        let response_text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Admin API returned non-success status"
            );
            return Err(ShopifyError::GraphQL(vec![GraphQLError::from_message(
                format!(
                    "HTTP {status}: {}",
                    response_text.chars().take(200).collect::<String>()
                ),
            )]));
        }

        let graphql_response: GraphQLResponse<T> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Admin API GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            tracing::debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(errors));
        }

        graphql_response.data.ok_or_else(|| {
            tracing::error!(
                body = %response_text.chars().take(500).collect::<String>(),
                "Admin API response has no data and no errors"
            );
            ShopifyError::GraphQL(vec![GraphQLError::from_message(
                "No data in response".to_string(),
            )])
        })
    }
}

fn transport_error(error: reqwest::Error) -> ShopifyError {
    if error.is_timeout() {
        ShopifyError::Timeout
    } else {
        ShopifyError::Http(error)
    }
}
