//! Per-request CSP nonces for the inline bootstrap script.
//!
//! The security-headers middleware embeds the nonce into `script-src`, and
//! page templates stamp the same value onto their `<script>` tags. A fresh
//! 128-bit random value per request keeps the policy useless to injected
//! markup.

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;

/// Nonce length in raw bytes, before base64.
const NONCE_BYTES: usize = 16;

/// A CSP nonce scoped to one request.
#[derive(Clone, Debug)]
pub struct CspNonce(pub String);

impl CspNonce {
    /// Generate a fresh random nonce.
    #[must_use]
    pub fn generate() -> Self {
        let mut raw = [0u8; NONCE_BYTES];
        rand::rng().fill_bytes(&mut raw);
        Self(STANDARD.encode(raw))
    }

    /// The nonce value for templates and the CSP header.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Attach a fresh [`CspNonce`] to the request's extensions.
///
/// Runs before the security-headers middleware, which reads the nonce back
/// when it builds the CSP header.
pub async fn csp_nonce_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(CspNonce::generate());
    next.run(request).await
}

/// Extractor for handlers that render pages with inline scripts.
impl<S> FromRequestParts<S> for CspNonce
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Self>() {
            Some(nonce) => Ok(nonce.clone()),
            None => {
                tracing::warn!("CSP nonce missing from request extensions; check middleware order");
                Ok(Self(String::new()))
            }
        }
    }
}
