//! Request correlation IDs.
//!
//! Every request gets an `x-request-id`: either the one a fronting proxy
//! already assigned, or a fresh UUID v4. The ID is recorded on the tracing
//! span, tagged on the Sentry scope, and echoed in the response headers so a
//! shopper report can be matched to server logs.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// Header carrying the request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Upstream IDs longer than this are replaced rather than trusted.
const MAX_INBOUND_ID_LEN: usize = 64;

/// Attach a request ID to the request's span, Sentry scope, and response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id =
        inbound_id(request.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Accept an upstream ID only if it is non-empty and short.
fn inbound_id(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| !id.is_empty() && id.len() <= MAX_INBOUND_ID_LEN)
        .map(String::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;

    #[test]
    fn test_inbound_id_honored() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("trace-42"));
        assert_eq!(inbound_id(&headers).as_deref(), Some("trace-42"));
    }

    #[test]
    fn test_oversized_or_empty_inbound_id_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(""));
        assert!(inbound_id(&headers).is_none());

        let long = "x".repeat(MAX_INBOUND_ID_LEN + 1);
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(&long).unwrap());
        assert!(inbound_id(&headers).is_none());
    }

    #[test]
    fn test_missing_header_yields_none() {
        assert!(inbound_id(&HeaderMap::new()).is_none());
    }
}
