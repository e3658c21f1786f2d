//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. The session only carries
//! the shopper's cart ID; losing it on restart means an empty cart, not lost
//! data, so a memory store is enough.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "zp_session";

/// How long an idle session (and with it the cart handle) stays alive.
const SESSION_IDLE_EXPIRY: cookie::time::Duration = cookie::time::Duration::days(7);

/// Create the session layer with an in-memory store.
///
/// The cookie is `HttpOnly` and `SameSite=Lax`; the `Secure` flag follows
/// whether the configured base URL is https.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(SESSION_IDLE_EXPIRY))
        .with_secure(config.base_url.starts_with("https://"))
        .with_same_site(cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
