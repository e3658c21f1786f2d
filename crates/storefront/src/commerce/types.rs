//! Domain types for the commerce API.
//!
//! These types deserialize directly from the API's JSON payloads and are
//! passed through to the view layer, which derives its own display structs
//! from them.

use serde::{Deserialize, Serialize};
use zeroproof_core::{CartId, CartLineId, CollectionId, Money, ProductId, VariantId};

// =============================================================================
// Image Types
// =============================================================================

/// Product or collection image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

// =============================================================================
// Collection Types
// =============================================================================

/// A curated grouping of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    /// Collection ID.
    pub id: CollectionId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Collection image.
    pub image: Option<Image>,
    /// Whether the collection is merchandised as featured.
    pub featured: bool,
}

// =============================================================================
// Product Types
// =============================================================================

/// A product in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Plain text description.
    pub description: String,
    /// Current price.
    pub price: Money,
    /// Compare-at price (original price if on sale).
    pub compare_at_price: Option<Money>,
    /// Product image.
    pub image: Option<Image>,
    /// Whether the product is available for sale.
    pub available: bool,
    /// The purchasable variant backing this product.
    pub variant_id: VariantId,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Cart cost summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartCost {
    /// Subtotal before tax/shipping.
    pub subtotal: Money,
    /// Total amount.
    pub total: Money,
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Cart line ID.
    pub id: CartLineId,
    /// Quantity.
    pub quantity: i64,
    /// Price per unit.
    pub unit_price: Money,
    /// Line total.
    pub line_price: Money,
    /// Product name for display.
    pub product_name: String,
    /// Product image.
    pub image: Option<Image>,
}

/// A shopping cart.
///
/// Totals and pricing are computed by the commerce API; the storefront only
/// displays them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID.
    pub id: CartId,
    /// Commerce-hosted checkout URL.
    pub checkout_url: String,
    /// Total item quantity across all lines.
    pub total_quantity: i64,
    /// Cart cost summary.
    pub cost: CartCost,
    /// Cart lines.
    pub lines: Vec<CartLine>,
}

/// Input for adding a line to a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineInput {
    /// Product variant ID.
    pub variant_id: VariantId,
    /// Quantity to add.
    pub quantity: i64,
}
