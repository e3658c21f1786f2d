//! Application state shared across handlers.

use std::sync::Arc;

use crate::commerce::CommerceClient;
use crate::config::StorefrontConfig;
use crate::content::ContentStore;
use crate::services::klaviyo::{KlaviyoClient, KlaviyoError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like API clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    commerce: CommerceClient,
    klaviyo: KlaviyoClient,
    content: ContentStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `content` - Markdown content loaded at startup
    ///
    /// # Errors
    ///
    /// Returns an error if the Klaviyo client fails to build.
    pub fn new(config: StorefrontConfig, content: ContentStore) -> Result<Self, KlaviyoError> {
        let commerce = CommerceClient::new(&config.commerce);
        let klaviyo = KlaviyoClient::new(&config.klaviyo)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                commerce,
                klaviyo,
                content,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the commerce API client.
    #[must_use]
    pub fn commerce(&self) -> &CommerceClient {
        &self.inner.commerce
    }

    /// Get a reference to the Klaviyo client.
    #[must_use]
    pub fn klaviyo(&self) -> &KlaviyoClient {
        &self.inner.klaviyo
    }

    /// Get a reference to the markdown content store.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }
}
