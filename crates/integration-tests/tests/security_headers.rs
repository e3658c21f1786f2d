//! Tests for the response header middleware: CSP nonces, isolation headers,
//! and request ID correlation.

use axum::http::{HeaderValue, StatusCode};

use zeroproof_integration_tests::{body_text, get, send, test_app};

/// Pull a named header out of a response as a string.
fn header<'a>(response: &'a axum::http::Response<axum::body::Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_security_headers_applied_to_pages() {
    let app = test_app();

    let response = send(&app, get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let csp = header(&response, "content-security-policy").expect("CSP header should be set");
    assert!(csp.contains("default-src 'none'"));
    assert!(csp.contains("'nonce-"));
    assert!(csp.contains("https://unpkg.com"));
    assert!(csp.contains("frame-ancestors 'none'"));
    assert!(csp.contains("img-src 'self' https:"));

    assert_eq!(header(&response, "x-frame-options"), Some("DENY"));
    assert_eq!(header(&response, "x-content-type-options"), Some("nosniff"));
    assert_eq!(header(&response, "referrer-policy"), Some("no-referrer"));
    assert_eq!(
        header(&response, "cross-origin-embedder-policy"),
        Some("credentialless")
    );
    assert_eq!(
        header(&response, "cache-control"),
        Some("no-store, max-age=0")
    );
    assert!(response.headers().contains_key("permissions-policy"));
}

#[tokio::test]
async fn test_csp_nonce_matches_inline_script() {
    let app = test_app();

    let response = send(&app, get("/")).await;
    let csp = header(&response, "content-security-policy")
        .expect("CSP header should be set")
        .to_string();
    let html = body_text(response).await;

    let nonce = csp
        .split("'nonce-")
        .nth(1)
        .and_then(|rest| rest.split('\'').next())
        .expect("CSP should carry a nonce");
    assert!(!nonce.is_empty());

    // The drawer-close bootstrap script must carry the same nonce
    assert!(html.contains(&format!("nonce=\"{nonce}\"")));
}

#[tokio::test]
async fn test_csp_nonce_differs_per_request() {
    let app = test_app();

    let first = send(&app, get("/")).await;
    let second = send(&app, get("/")).await;

    let csp_first = header(&first, "content-security-policy").expect("CSP header");
    let csp_second = header(&second, "content-security-policy").expect("CSP header");
    assert_ne!(csp_first, csp_second);
}

#[tokio::test]
async fn test_request_id_echoed_when_provided() {
    let app = test_app();

    let mut request = get("/health");
    request
        .headers_mut()
        .insert("x-request-id", HeaderValue::from_static("trace-abc-123"));

    let response = send(&app, request).await;
    assert_eq!(header(&response, "x-request-id"), Some("trace-abc-123"));
}

#[tokio::test]
async fn test_request_id_generated_when_missing() {
    let app = test_app();

    let response = send(&app, get("/health")).await;
    let request_id = header(&response, "x-request-id").expect("request ID should be generated");

    // Generated IDs are UUID v4
    assert_eq!(request_id.len(), 36);
}
