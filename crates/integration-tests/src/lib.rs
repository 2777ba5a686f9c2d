//! Integration tests for the swatch relay.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p swatch-relay-integration-tests
//! ```
//!
//! The tests in `tests/` spawn the full router on an ephemeral port and point
//! it at a wiremock stand-in for the Shopify Admin API, so they need neither
//! credentials nor network access.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::time::Duration;

use secrecy::SecretString;
use swatch_relay_server::config::{AppConfig, ImageSource, ShopifyConfig};
use swatch_relay_server::routes;
use swatch_relay_server::state::AppState;

/// A running relay instance bound to an ephemeral local port.
pub struct TestApp {
    addr: SocketAddr,
}

impl TestApp {
    /// Spawn the relay with the given configuration.
    ///
    /// The server task runs until the test process exits; tests do not need
    /// to shut it down.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(config: AppConfig) -> Self {
        let state = AppState::new(config);
        let app = routes::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read test listener address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test server stopped unexpectedly");
        });

        Self { addr }
    }

    /// Full URL for a path on this instance.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

/// App configuration for tests; the bind address here is unused because
/// [`TestApp::spawn`] always binds an ephemeral port.
#[must_use]
pub fn app_config(shopify: Option<ShopifyConfig>) -> AppConfig {
    AppConfig {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        port: 0,
        shopify,
    }
}

/// Shopify configuration pointed at a mock endpoint.
#[must_use]
pub fn shopify_config(endpoint: String, image_source: ImageSource) -> ShopifyConfig {
    ShopifyConfig {
        domain: "test.myshopify.com".to_string(),
        api_version: "2024-07".to_string(),
        access_token: SecretString::from("shpat_test_token"),
        endpoint: Some(endpoint),
        image_source,
        timeout: Duration::from_secs(5),
    }
}

/// Shopify configuration with a custom upstream timeout.
#[must_use]
pub fn shopify_config_with_timeout(
    endpoint: String,
    image_source: ImageSource,
    timeout: Duration,
) -> ShopifyConfig {
    ShopifyConfig {
        timeout,
        ..shopify_config(endpoint, image_source)
    }
}
