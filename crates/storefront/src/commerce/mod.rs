//! Commerce API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTPS with a bearer token; the commerce API is the
//!   source of truth - NO local sync, direct API calls
//! - In-memory caching via `moka` for catalog responses (5 minute TTL)
//! - Carts are mutable state and are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use zeroproof_storefront::commerce::CommerceClient;
//!
//! let client = CommerceClient::new(&config.commerce);
//!
//! // List collections for the nav and home page
//! let collections = client.list_collections().await?;
//!
//! // Create a cart and add an item
//! let cart = client.create_cart(None).await?;
//! let cart = client
//!     .add_to_cart(&cart.id, vec![CartLineInput {
//!         variant_id: product.variant_id.clone(),
//!         quantity: 1,
//!     }])
//!     .await?;
//! ```

mod cache;
pub mod types;

pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Method;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};
use zeroproof_core::{CartId, CartLineId, CollectionId};

use crate::config::CommerceConfig;

use cache::CacheValue;

/// Errors that can occur when interacting with the commerce API.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a server-side error.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the commerce API.
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// User error from a mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),
}

// =============================================================================
// Response envelopes
// =============================================================================

#[derive(Debug, Deserialize)]
struct CollectionsEnvelope {
    collections: Vec<Collection>,
}

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct CartEnvelope {
    cart: Cart,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// =============================================================================
// CommerceClient
// =============================================================================

/// Client for the commerce API.
///
/// Provides access to collections, products, and cart operations.
/// Collections and products are cached for 5 minutes.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
    cache: Cache<String, CacheValue>,
}

impl CommerceClient {
    /// Create a new commerce API client.
    ///
    /// Requests are bounded with timeouts so that a hung backend degrades
    /// page renders instead of stalling them.
    #[must_use]
    pub fn new(config: &CommerceConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("HTTP client builder failed, falling back to defaults: {e}");
                reqwest::Client::new()
            });

        Self {
            inner: Arc::new(CommerceClientInner {
                client,
                base_url: config.api_url.clone(),
                api_token: config.api_token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Execute a request against the commerce API and decode the JSON body.
    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, CommerceError> {
        let url = format!("{}{path}", self.inner.base_url);

        let mut builder = self
            .inner
            .client
            .request(method, &url)
            .bearer_auth(&self.inner.api_token);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CommerceError::RateLimited { retry_after });
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CommerceError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            // The API wraps failures as {"error": {"message": ...}}
            let message = serde_json::from_str::<ApiErrorEnvelope>(&response_text).map_or_else(
                |_| response_text.chars().take(200).collect::<String>(),
                |envelope| envelope.error.message,
            );

            if status.is_client_error() {
                return Err(CommerceError::UserError(message));
            }

            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Commerce API returned non-success status"
            );
            return Err(CommerceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(decoded) => Ok(decoded),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse commerce API response"
                );
                Err(CommerceError::Parse(e))
            }
        }
    }

    /// Check that the commerce API is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the health endpoint is unreachable or unhealthy.
    pub async fn ping(&self) -> Result<(), CommerceError> {
        let url = format!("{}/health", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(CommerceError::Api {
                status: status.as_u16(),
                message: "health check failed".to_string(),
            })
        }
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// List all collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_collections(&self) -> Result<Vec<Collection>, CommerceError> {
        let cache_key = "collections".to_string();

        // Check cache
        if let Some(CacheValue::Collections(collections)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let envelope: CollectionsEnvelope = self
            .request(Method::GET, "/storefront/collections", None)
            .await?;

        // Cache the result
        self.inner
            .cache
            .insert(cache_key, CacheValue::Collections(envelope.collections.clone()))
            .await;

        Ok(envelope.collections)
    }

    /// Get products, optionally filtered to a single collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        collection: Option<&CollectionId>,
        limit: i64,
    ) -> Result<Vec<Product>, CommerceError> {
        let cache_key = format!(
            "products:{limit}:{}",
            collection.map_or("", CollectionId::as_str)
        );

        // Check cache
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut path = format!("/storefront/products?limit={limit}");
        if let Some(id) = collection {
            path.push_str(&format!("&collection={}", urlencoding::encode(id.as_str())));
        }

        let envelope: ProductsEnvelope = self.request(Method::GET, &path, None).await?;

        // Cache the result
        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(envelope.products.clone()))
            .await;

        Ok(envelope.products)
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Create a new cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails.
    #[instrument(skip(self, lines))]
    pub async fn create_cart(
        &self,
        lines: Option<Vec<CartLineInput>>,
    ) -> Result<Cart, CommerceError> {
        let body = serde_json::json!({
            "lines": lines.unwrap_or_default(),
        });

        let envelope: CartEnvelope = self
            .request(Method::POST, "/storefront/carts", Some(&body))
            .await?;

        Ok(envelope.cart)
    }

    /// Get an existing cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is not found or the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, CommerceError> {
        let path = format!(
            "/storefront/carts/{}",
            urlencoding::encode(cart_id.as_str())
        );

        let envelope: CartEnvelope = self.request(Method::GET, &path, None).await?;

        Ok(envelope.cart)
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_to_cart(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, CommerceError> {
        let path = format!(
            "/storefront/carts/{}/lines",
            urlencoding::encode(cart_id.as_str())
        );
        let body = serde_json::json!({ "lines": lines });

        let envelope: CartEnvelope = self.request(Method::POST, &path, Some(&body)).await?;

        Ok(envelope.cart)
    }

    /// Update the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails.
    #[instrument(skip(self), fields(cart_id = %cart_id, line_id = %line_id))]
    pub async fn update_cart_line(
        &self,
        cart_id: &CartId,
        line_id: &CartLineId,
        quantity: i64,
    ) -> Result<Cart, CommerceError> {
        let path = format!(
            "/storefront/carts/{}/lines/{}",
            urlencoding::encode(cart_id.as_str()),
            urlencoding::encode(line_id.as_str())
        );
        let body = serde_json::json!({ "quantity": quantity });

        let envelope: CartEnvelope = self.request(Method::PATCH, &path, Some(&body)).await?;

        Ok(envelope.cart)
    }

    /// Remove a line from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails.
    #[instrument(skip(self), fields(cart_id = %cart_id, line_id = %line_id))]
    pub async fn remove_cart_line(
        &self,
        cart_id: &CartId,
        line_id: &CartLineId,
    ) -> Result<Cart, CommerceError> {
        let path = format!(
            "/storefront/carts/{}/lines/{}",
            urlencoding::encode(cart_id.as_str()),
            urlencoding::encode(line_id.as_str())
        );

        let envelope: CartEnvelope = self.request(Method::DELETE, &path, None).await?;

        Ok(envelope.cart)
    }
}
