//! Cache types for commerce API responses.

use crate::commerce::types::{Collection, Product};

/// Cached value types.
///
/// Carts are deliberately absent: they are mutable state and always fetched
/// fresh.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Collections(Vec<Collection>),
    Products(Vec<Product>),
}
