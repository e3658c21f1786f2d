//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `COMMERCE_API_URL` - Base URL of the commerce API
//! - `COMMERCE_API_TOKEN` - Commerce API bearer token (server-side only)
//! - `KLAVIYO_API_KEY` - Klaviyo private API key for newsletter signups
//! - `KLAVIYO_LIST_ID` - Klaviyo list that receives newsletter subscribers
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (e.g., production)
//! - `SENTRY_SAMPLE_RATE` - Error sample rate 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Tracing sample rate 0.0-1.0 (default: 0.1)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Secrets below this Shannon entropy cannot plausibly be generated keys.
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Commerce API configuration
    pub commerce: CommerceConfig,
    /// Klaviyo newsletter configuration
    pub klaviyo: KlaviyoConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0-1.0)
    pub sentry_sample_rate: f32,
    /// Sentry tracing sample rate (0.0-1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Commerce API configuration.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone)]
pub struct CommerceConfig {
    /// Base URL of the commerce API (e.g., <https://api.zeroproofbar.com>)
    pub api_url: String,
    /// Bearer token for the commerce API (server-side only)
    pub api_token: SecretString,
}

impl std::fmt::Debug for CommerceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommerceConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

/// Klaviyo newsletter configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct KlaviyoConfig {
    /// Klaviyo private API key
    pub api_key: SecretString,
    /// List ID that receives newsletter subscribers
    pub list_id: String,
}

impl std::fmt::Debug for KlaviyoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KlaviyoConfig")
            .field("api_key", &"[REDACTED]")
            .field("list_id", &self.list_id)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = env_or("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = env_or("STOREFRONT_PORT", "3000").parse::<u16>().map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
        })?;

        Ok(Self {
            host,
            port,
            base_url: required_env("STOREFRONT_BASE_URL")?,
            commerce: CommerceConfig::from_env()?,
            klaviyo: KlaviyoConfig::from_env()?,
            sentry_dsn: optional_env("SENTRY_DSN"),
            sentry_environment: optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: rate_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: rate_env("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CommerceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_url = required_env("COMMERCE_API_URL")?;
        // Catch malformed URLs at startup rather than on the first request
        url::Url::parse(&api_url).map_err(|e| {
            ConfigError::InvalidEnvVar("COMMERCE_API_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token: secret_env("COMMERCE_API_TOKEN")?,
        })
    }
}

impl KlaviyoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: secret_env("KLAVIYO_API_KEY")?,
            list_id: required_env("KLAVIYO_LIST_ID")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Read a required environment variable.
fn required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Read an optional environment variable.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Read an environment variable, falling back to a default.
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a 0.0-1.0 sample rate.
fn rate_env(key: &str, default: &str) -> Result<f32, ConfigError> {
    let rate = env_or(key, default)
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

/// Read a required secret and reject placeholder or low-entropy values.
fn secret_env(key: &str) -> Result<SecretString, ConfigError> {
    let value = required_env(key)?;
    check_secret(key, &value)?;
    Ok(SecretString::from(value))
}

/// Shannon entropy of the string, in bits per character.
fn entropy_bits_per_char(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, f64> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0.0) += 1.0;
    }

    let len: f64 = freq.values().sum();
    freq.values()
        .map(|count| {
            let p = count / len;
            -p * p.log2()
        })
        .sum()
}

/// Reject placeholder-looking or low-entropy secrets.
///
/// Catches copy-pasted template values ("changeme", "your-...") and values
/// too uniform to be generated credentials.
fn check_secret(var_name: &str, secret: &str) -> Result<(), ConfigError> {
    let lowered = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lowered.contains(**p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = entropy_bits_per_char(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
