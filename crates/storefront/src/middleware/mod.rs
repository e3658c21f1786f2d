//! HTTP middleware for the storefront.
//!
//! Ordering matters and is fixed in `build_router`. A request passes through
//! Sentry capture, `TraceLayer`, request ID, CSP nonce, the session layer,
//! and security headers, in that order. The security headers layer sits
//! innermost of these because its CSP reads the nonce issued further out.
//! Rate limiting is attached per route group, not globally.

pub mod csp;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use rate_limit::{api_rate_limiter, newsletter_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
