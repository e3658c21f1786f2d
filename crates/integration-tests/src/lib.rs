//! Integration tests for the Zero-Proof Bar storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process router tests (no external services needed)
//! cargo test -p zeroproof-integration-tests
//!
//! # Live smoke tests against a running storefront
//! STOREFRONT_BASE_URL=http://localhost:3000 \
//!     cargo test -p zeroproof-integration-tests -- --ignored
//! ```
//!
//! The in-process tests drive the full router through `tower::ServiceExt`,
//! with the commerce backend pointed at an unroutable address. The storefront
//! is built to degrade when the backend is down (pages still render, carts
//! read as empty), so those paths are assertable without any fixtures.

use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use tower::ServiceExt;

use zeroproof_storefront::config::{CommerceConfig, KlaviyoConfig, StorefrontConfig};
use zeroproof_storefront::content::ContentStore;
use zeroproof_storefront::state::AppState;

/// Client IP sent on every test request. The rate limiter keys on proxy
/// headers and rejects requests without one.
pub const TEST_CLIENT_IP: &str = "203.0.113.7";

/// Configuration pointing at a port nothing listens on, so every commerce
/// call fails fast with a connection error.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        commerce: CommerceConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            api_token: SecretString::from("kQ3vZ8pR1mW6tY4uJ7xN2cL5bH0dF9gS"),
        },
        klaviyo: KlaviyoConfig {
            api_key: SecretString::from("pk_T8rM3nV6wQ9zK2jX5bC1fG4hL7pD0sA"),
            list_id: "AbC123".to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Content store loaded from the real storefront content directory.
#[must_use]
pub fn test_content() -> ContentStore {
    let content_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/content");
    ContentStore::load(&content_dir).expect("storefront content should load")
}

/// Full application router with the production middleware stack.
#[must_use]
pub fn test_app() -> Router {
    let state = AppState::new(test_config(), test_content()).expect("state should build");
    zeroproof_storefront::build_router(state)
}

/// Build a GET request with the test client IP attached.
#[must_use]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-forwarded-for", TEST_CLIENT_IP)
        .body(Body::empty())
        .expect("request should build")
}

/// Build a form POST request with the test client IP attached.
#[must_use]
pub fn post_form(uri: &str, form_body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-forwarded-for", TEST_CLIENT_IP)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form_body.to_string()))
        .expect("request should build")
}

/// Send a request through a clone of the router.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("router should produce a response")
}

/// Collect a response body into a string.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}
