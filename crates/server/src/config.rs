//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Upstream access (both needed for the swatches endpoint to serve data)
//! - `SHOPIFY_DOMAIN` - Shop domain (e.g., your-store.myshopify.com)
//! - `ADMIN_TOKEN` - Admin API access token
//!
//! When either is absent the server still starts; the swatches endpoint
//! reports the missing configuration on each request instead.
//!
//! ## Optional
//! - `SWATCH_HOST` - Bind address (default: 127.0.0.1)
//! - `SWATCH_PORT` - Listen port (default: 3000)
//! - `SHOPIFY_API_VERSION` - Admin API version (default: 2024-07)
//! - `SHOPIFY_ADMIN_ENDPOINT` - Full GraphQL endpoint URL, overrides the one
//!   derived from domain + version (useful against a local mock)
//! - `SHOPIFY_TIMEOUT_SECS` - Per-request upstream timeout (default: 30)
//! - `SWATCH_IMAGE_SOURCE` - `lookup` (default) resolves `main_image` media
//!   references with one node query per record; `inline` expects the page
//!   query to return the image URL alongside the field

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Swatch relay application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Admin API configuration, absent when credentials are not set
    pub shopify: Option<ShopifyConfig>,
}

/// Shopify Admin API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shop domain (e.g., your-store.myshopify.com)
    pub domain: String,
    /// Admin API version segment (e.g., 2024-07)
    pub api_version: String,
    /// Admin API access token
    pub access_token: SecretString,
    /// Full GraphQL endpoint override; derived from domain + version when unset
    pub endpoint: Option<String>,
    /// Where `main_image` URLs come from
    pub image_source: ImageSource,
    /// Upstream request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("domain", &self.domain)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("image_source", &self.image_source)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// How `main_image` field values get resolved to image URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Issue one `node(id:)` lookup per media reference (default)
    Lookup,
    /// Expect the page query to carry the image URL inline on the field
    Inline,
}

impl FromStr for ImageSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lookup" => Ok(Self::Lookup),
            "inline" => Ok(Self::Inline),
            other => Err(format!("expected 'lookup' or 'inline', got '{other}'")),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an optional variable is present but
    /// unparseable. Missing Shopify credentials are not an error here; they
    /// surface per request.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SWATCH_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SWATCH_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SWATCH_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SWATCH_PORT".to_string(), e.to_string()))?;
        let shopify = ShopifyConfig::from_env()?;

        Ok(Self {
            host,
            port,
            shopify,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyConfig {
    /// Load the Shopify block from environment.
    ///
    /// Returns `Ok(None)` when `SHOPIFY_DOMAIN` or `ADMIN_TOKEN` is unset or
    /// empty, so the server can boot without upstream access.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        // Empty values behave like unset ones
        let domain = get_optional_env("SHOPIFY_DOMAIN").filter(|v| !v.is_empty());
        let token = get_optional_env("ADMIN_TOKEN").filter(|v| !v.is_empty());
        let (Some(domain), Some(token)) = (domain, token) else {
            return Ok(None);
        };

        let image_source = get_env_or_default("SWATCH_IMAGE_SOURCE", "lookup")
            .parse::<ImageSource>()
            .map_err(|e| ConfigError::InvalidEnvVar("SWATCH_IMAGE_SOURCE".to_string(), e))?;
        let timeout_secs = get_env_or_default("SHOPIFY_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPIFY_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Some(Self {
            domain,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", "2024-07"),
            access_token: SecretString::from(token),
            endpoint: get_optional_env("SHOPIFY_ADMIN_ENDPOINT"),
            image_source,
            timeout: Duration::from_secs(timeout_secs),
        }))
    }

    /// Returns the GraphQL endpoint URL for this shop.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        self.endpoint.clone().unwrap_or_else(|| {
            format!(
                "https://{}/admin/api/{}/graphql.json",
                self.domain, self.api_version
            )
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
