//! Response security headers.
//!
//! Every response gets a locked-down baseline: strict CSP with a per-request
//! script nonce, full permissions denial, no caching, and cross-origin
//! isolation. Directives are loosened one at a time when a feature needs them.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use super::csp::CspNonce;

/// Permissions-Policy value denying every sensitive browser feature.
const PERMISSIONS_POLICY: &str = "accelerometer=(), ambient-light-sensor=(), autoplay=(), \
    battery=(), browsing-topics=(), camera=(), cross-origin-isolated=(), \
    display-capture=(), document-domain=(), encrypted-media=(), \
    execution-while-not-rendered=(), execution-while-out-of-viewport=(), \
    fullscreen=(), geolocation=(), gyroscope=(), hid=(), idle-detection=(), \
    interest-cohort=(), magnetometer=(), microphone=(), midi=(), \
    navigation-override=(), payment=(), picture-in-picture=(), \
    publickey-credentials-get=(), screen-wake-lock=(), serial=(), sync-xhr=(), \
    usb=(), web-share=(), xr-spatial-tracking=()";

/// Append the security header baseline to the response.
///
/// Applied to every route, static assets included:
///
/// - `X-Frame-Options: DENY` and `frame-ancestors 'none'` against clickjacking
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: no-referrer`
/// - `Permissions-Policy` denying all sensitive features
/// - `Cache-Control: no-store, max-age=0` so session-dependent markup (the
///   cart badge in particular) is never cached
/// - `Cross-Origin-Opener-Policy` / `Cross-Origin-Resource-Policy:
///   same-origin` for isolation
/// - `Cross-Origin-Embedder-Policy: credentialless` rather than
///   `require-corp`, since product imagery and the htmx CDN send no CORP
///   headers
/// - `X-DNS-Prefetch-Control: off`
///
/// The CSP is assembled per request because its `script-src` directive embeds
/// the nonce issued by [`csp_nonce_middleware`](super::csp::csp_nonce_middleware).
/// The inline cart drawer script and the htmx bundle from unpkg are the only
/// scripts allowed to run; `img-src https:` admits the commerce backend's
/// image CDN.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let nonce = request
        .extensions()
        .get::<CspNonce>()
        .map_or_else(String::new, |n| n.value().to_string());

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    // Nonce is base64, so this only fails if the directive list itself is broken
    if let Ok(value) = HeaderValue::from_str(&build_csp(&nonce)) {
        headers.insert(CONTENT_SECURITY_POLICY, value);
    } else {
        tracing::error!("Content-Security-Policy value failed header validation");
    }

    let fixed_headers = [
        (X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
        (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (REFERRER_POLICY, HeaderValue::from_static("no-referrer")),
        (CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0")),
        (
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static(PERMISSIONS_POLICY),
        ),
        (
            HeaderName::from_static("cross-origin-opener-policy"),
            HeaderValue::from_static("same-origin"),
        ),
        (
            HeaderName::from_static("cross-origin-resource-policy"),
            HeaderValue::from_static("same-origin"),
        ),
        (
            HeaderName::from_static("cross-origin-embedder-policy"),
            HeaderValue::from_static("credentialless"),
        ),
        (
            HeaderName::from_static("x-dns-prefetch-control"),
            HeaderValue::from_static("off"),
        ),
    ];
    for (name, value) in fixed_headers {
        headers.insert(name, value);
    }

    response
}

/// Content-Security-Policy for the given script nonce.
fn build_csp(nonce: &str) -> String {
    let script_src = format!("script-src 'self' 'nonce-{nonce}' https://unpkg.com");
    [
        "default-src 'none'",
        script_src.as_str(),
        "style-src 'self'",
        "font-src 'self'",
        "img-src 'self' https:",
        "connect-src 'self'",
        "frame-src 'none'",
        "object-src 'none'",
        "base-uri 'self'",
        "form-action 'self'",
        "frame-ancestors 'none'",
        "upgrade-insecure-requests",
    ]
    .join("; ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_embeds_the_script_nonce() {
        let csp = build_csp("abc123");
        assert!(csp.contains("script-src 'self' 'nonce-abc123' https://unpkg.com"));
        assert!(csp.starts_with("default-src 'none'; "));
    }

    #[test]
    fn test_csp_denies_framing_and_plugins() {
        let csp = build_csp("n");
        assert!(csp.contains("frame-ancestors 'none'"));
        assert!(csp.contains("frame-src 'none'"));
        assert!(csp.contains("object-src 'none'"));
        assert!(csp.ends_with("upgrade-insecure-requests"));
    }

    #[test]
    fn test_csp_and_permissions_policy_survive_header_validation() {
        let csp = build_csp(&crate::middleware::CspNonce::generate().0);
        assert!(HeaderValue::from_str(&csp).is_ok());
        assert!(HeaderValue::from_str(PERMISSIONS_POLICY).is_ok());
    }
}
