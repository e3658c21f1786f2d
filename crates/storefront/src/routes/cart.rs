//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart ID is stored in the session and mapped to a backend cart; the
//! handlers return either the count badge or the drawer fragment, and mutations
//! fire an `HX-Trigger: cart-updated` event so the badge refreshes itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use zeroproof_core::{CartId, CartLineId, VariantId};

use crate::commerce::types::{Cart, CartLine, CartLineInput};
use crate::error::add_breadcrumb;
use crate::filters;
use crate::state::AppState;

/// Session key for the backend cart ID.
const CART_ID_KEY: &str = "cart_id";

// =============================================================================
// View Models
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: String,
    pub line_price: String,
    pub image_url: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: i64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: "$0.00".to_string(),
            item_count: 0,
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines.iter().map(CartItemView::from).collect(),
            subtotal: cart.cost.subtotal.to_string(),
            item_count: cart.total_quantity,
        }
    }
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.as_str().to_string(),
            name: line.product_name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            line_price: line.line_price.to_string(),
            image_url: line.image.as_ref().map(|img| img.url.clone()),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart ID from the session.
async fn get_cart_id(session: &Session) -> Option<CartId> {
    session
        .get::<String>(CART_ID_KEY)
        .await
        .ok()
        .flatten()
        .map(CartId::from)
}

/// Set the cart ID in the session.
async fn set_cart_id(
    session: &Session,
    cart_id: &CartId,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(CART_ID_KEY, cart_id.as_str()).await
}

// =============================================================================
// Forms and Templates
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub variant_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: String,
}

/// Cart drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Fetch the session's cart, degrading to an empty view on any failure.
async fn load_cart_view(state: &AppState, session: &Session) -> CartView {
    match get_cart_id(session).await {
        Some(cart_id) => match state.commerce().get_cart(&cart_id).await {
            Ok(cart) => CartView::from(&cart),
            Err(e) => {
                tracing::warn!("Failed to fetch cart {cart_id}: {e}");
                CartView::empty()
            }
        },
        None => CartView::empty(),
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let count = load_cart_view(&state, &session).await.item_count;
    CartCountTemplate { count }
}

/// Get the cart drawer (HTMX).
#[instrument(skip(state, session))]
pub async fn drawer(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = load_cart_view(&state, &session).await;
    CartDrawerTemplate { cart }
}

/// Add item to cart (HTMX).
///
/// Creates a new cart if one doesn't exist, or adds to the existing cart.
/// Returns the count badge plus an HTMX trigger so every other cart element
/// updates itself.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let quantity = i64::from(form.quantity.unwrap_or(1));
    let line = CartLineInput {
        variant_id: VariantId::from(form.variant_id),
        quantity,
    };

    let result = match get_cart_id(&session).await {
        Some(cart_id) => state.commerce().add_to_cart(&cart_id, vec![line]).await,
        None => state.commerce().create_cart(Some(vec![line])).await,
    };

    match result {
        Ok(cart) => {
            if let Err(e) = set_cart_id(&session, &cart.id).await {
                tracing::error!("Failed to save cart ID to session: {e}");
            }

            add_breadcrumb("cart", "Added item to cart", &[("cart_id", cart.id.as_str())]);

            (
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CartCountTemplate {
                    count: cart.total_quantity,
                },
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to add item to cart: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"cart-error\">Error adding to cart</span>"),
            )
                .into_response()
        }
    }
}

/// Update cart line quantity (HTMX).
///
/// A quantity of zero removes the line. Returns the refreshed drawer.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let Some(cart_id) = get_cart_id(&session).await else {
        return CartDrawerTemplate {
            cart: CartView::empty(),
        }
        .into_response();
    };

    let line_id = CartLineId::from(form.line_id);
    let result = if form.quantity == 0 {
        state.commerce().remove_cart_line(&cart_id, &line_id).await
    } else {
        state
            .commerce()
            .update_cart_line(&cart_id, &line_id, i64::from(form.quantity))
            .await
    };

    match result {
        Ok(cart) => (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartDrawerTemplate {
                cart: CartView::from(&cart),
            },
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update cart: {e}");
            CartDrawerTemplate {
                cart: CartView::empty(),
            }
            .into_response()
        }
    }
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let Some(cart_id) = get_cart_id(&session).await else {
        return CartDrawerTemplate {
            cart: CartView::empty(),
        }
        .into_response();
    };

    match state
        .commerce()
        .remove_cart_line(&cart_id, &CartLineId::from(form.line_id))
        .await
    {
        Ok(cart) => (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartDrawerTemplate {
                cart: CartView::from(&cart),
            },
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to remove from cart: {e}");
            CartDrawerTemplate {
                cart: CartView::empty(),
            }
            .into_response()
        }
    }
}

/// Redirect to the backend checkout.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Response {
    let Some(cart_id) = get_cart_id(&session).await else {
        // No cart yet, back to the home page
        return Redirect::to("/").into_response();
    };

    match state.commerce().get_cart(&cart_id).await {
        Ok(cart) => Redirect::to(&cart.checkout_url).into_response(),
        Err(e) => {
            tracing::error!("Failed to get cart for checkout: {e}");
            Redirect::to("/").into_response()
        }
    }
}
