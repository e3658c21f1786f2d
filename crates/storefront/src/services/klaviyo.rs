//! Klaviyo client for newsletter signups.
//!
//! The storefront only writes to Klaviyo: one call that subscribes a visitor
//! to the configured list. Profile management beyond that lives in the
//! Klaviyo dashboard.

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::KlaviyoConfig;

/// Klaviyo API version.
const API_REVISION: &str = "2024-10-15";

/// Klaviyo API base URL.
const BASE_URL: &str = "https://a.klaviyo.com/api";

/// Errors from the Klaviyo API.
#[derive(Debug, Error)]
pub enum KlaviyoError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Klaviyo API client.
#[derive(Clone)]
pub struct KlaviyoClient {
    client: reqwest::Client,
    list_id: String,
}

impl KlaviyoClient {
    /// Create a new Klaviyo API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &KlaviyoConfig) -> Result<Self, KlaviyoError> {
        let mut auth = HeaderValue::from_str(&format!(
            "Klaviyo-API-Key {}",
            config.api_key.expose_secret()
        ))
        .map_err(|e| KlaviyoError::Parse(format!("Invalid API key format: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert("revision", HeaderValue::from_static(API_REVISION));
        // Klaviyo speaks JSON:API, not plain application/json
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/vnd.api+json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(std::time::Duration::from_secs(5))
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            list_id: config.list_id.clone(),
        })
    }

    /// Subscribe an email address to the newsletter list.
    ///
    /// Creates or updates the profile and adds it to the configured list.
    /// A conflict response means the profile is already subscribed and is
    /// treated as success.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    pub async fn subscribe_email(&self, email: &str) -> Result<(), KlaviyoError> {
        let response = self
            .client
            .post(format!("{BASE_URL}/profile-subscription-bulk-create-jobs"))
            .json(&self.subscription_payload(email))
            .send()
            .await?;

        // The bulk job endpoint answers 202 Accepted on the happy path
        let status = response.status();
        if status.is_success() || status == StatusCode::CONFLICT {
            return Ok(());
        }

        Err(KlaviyoError::Api {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        })
    }

    /// JSON:API body for the subscription bulk-create job.
    fn subscription_payload(&self, email: &str) -> serde_json::Value {
        let profile = serde_json::json!({
            "type": "profile",
            "attributes": {
                "email": email,
                "subscriptions": { "email": { "marketing": { "consent": "SUBSCRIBED" } } }
            }
        });

        serde_json::json!({
            "data": {
                "type": "profile-subscription-bulk-create-job",
                "attributes": {
                    "custom_source": "Zero-Proof Bar Website",
                    "profiles": { "data": [profile] }
                },
                "relationships": {
                    "list": { "data": { "type": "list", "id": self.list_id } }
                }
            }
        })
    }
}
