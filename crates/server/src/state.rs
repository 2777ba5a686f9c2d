//! Application state shared across handlers.

use std::sync::Arc;

use crate::collector::SwatchCollector;
use crate::config::AppConfig;
use crate::shopify::AdminClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the swatch collector.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    collector: Option<SwatchCollector>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The collector is only built when Shopify credentials are configured;
    /// without them the swatches endpoint reports the missing configuration.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let collector = config.shopify.as_ref().map(|shopify| {
            SwatchCollector::new(AdminClient::new(shopify), shopify.image_source)
        });

        Self {
            inner: Arc::new(AppStateInner { config, collector }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the swatch collector, if credentials are configured.
    #[must_use]
    pub fn collector(&self) -> Option<&SwatchCollector> {
        self.inner.collector.as_ref()
    }
}
