//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (optional ?collection=<id> filter)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the commerce backend)
//!
//! # Fragments (HTMX)
//! GET  /fragments/products     - Products section (grid + header)
//!
//! # Cart (HTMX fragments)
//! GET  /cart/count             - Cart count badge
//! GET  /cart/drawer            - Cart drawer
//! POST /cart/add               - Add to cart (returns badge, triggers cart-updated)
//! POST /cart/update            - Update line quantity (returns drawer)
//! POST /cart/remove            - Remove line (returns drawer)
//!
//! # Checkout
//! GET  /checkout               - Redirect to the backend checkout
//!
//! # Newsletter
//! POST /newsletter/subscribe   - Subscribe (returns success or error fragment)
//!
//! # Blog
//! GET  /blog                   - Blog index
//! GET  /blog/{slug}            - Blog post
//! ```

pub mod blog;
pub mod cart;
pub mod home;
pub mod newsletter;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tracing::instrument;

use crate::middleware;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/count", get(cart::count))
        .route("/drawer", get(cart::drawer))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the blog routes router.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::index))
        .route("/{slug}", get(blog::show))
}

/// Create all routes for the storefront.
///
/// Cart and fragment endpoints sit behind the general API rate limiter;
/// newsletter signup gets the strict limiter.
pub fn routes() -> Router<AppState> {
    let fragment_routes = Router::new()
        .route("/products", get(home::products_fragment))
        .layer(middleware::api_rate_limiter());

    let newsletter_routes = Router::new()
        .route("/subscribe", post(newsletter::subscribe))
        .layer(middleware::newsletter_rate_limiter());

    Router::new()
        // Home page
        .route("/", get(home::home))
        // HTMX fragments
        .nest("/fragments", fragment_routes)
        // Cart routes
        .nest("/cart", cart_routes().layer(middleware::api_rate_limiter()))
        // Checkout redirect
        .route("/checkout", get(cart::checkout))
        // Newsletter signup
        .nest("/newsletter", newsletter_routes)
        // Blog
        .nest("/blog", blog_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies commerce backend connectivity before returning OK.
/// Returns 503 Service Unavailable if the backend is not reachable.
#[instrument(skip(state))]
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.commerce().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("Readiness check failed: {e}");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
