//! Shared page shell state for full-page templates.
//!
//! Every full page renders inside the storefront shell (header with nav and
//! cart toggle, footer with quick links). [`ShellView`] carries the state the
//! shell needs; page handlers load it once and embed it in their template.
//!
//! The cart badge itself is not rendered here. It is an HTMX fragment that
//! loads itself on page load and re-fetches on `cart-updated` events, so page
//! rendering never blocks on the commerce backend for a count.

use tracing::instrument;

use crate::state::AppState;

/// Main content layout variant.
///
/// Controls the width and centering of the `<main>` wrapper.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutVariant {
    #[default]
    Default,
    FullWidth,
    Centered,
}

impl LayoutVariant {
    /// CSS classes for the `<main>` element.
    #[must_use]
    pub const fn main_class(self) -> &'static str {
        match self {
            Self::Default => "flex-1",
            Self::FullWidth => "flex-1 w-full",
            Self::Centered => "flex-1 content-centered",
        }
    }
}

/// State for the page shell (header and footer).
#[derive(Clone)]
pub struct ShellView {
    /// Per-request CSP nonce for the inline bootstrap script.
    pub nonce: String,
    /// Optional page title rendered below the header bar.
    pub page_title: Option<String>,
    /// Whether the cart toggle (and drawer mount) render at all.
    pub show_cart: bool,
    /// Main content layout variant.
    pub layout: LayoutVariant,
    /// Extra classes for the header wrapper.
    pub header_class: &'static str,
    /// Extra classes for the footer wrapper.
    pub footer_class: &'static str,
    /// Whether the "Collections" nav link renders. False while the collection
    /// list is unavailable or empty, so the link simply omits itself.
    pub has_collections: bool,
}

impl ShellView {
    /// Load shell state for a page render.
    ///
    /// Collection presence degrades to `false` if the commerce backend is
    /// unreachable; the nav link disappears rather than the page failing.
    #[instrument(skip(state, nonce))]
    pub async fn load(state: &AppState, nonce: String) -> Self {
        let has_collections = state.commerce().list_collections().await.map_or_else(
            |e| {
                tracing::warn!("Failed to check collection presence for nav: {e}");
                false
            },
            |collections| !collections.is_empty(),
        );

        Self {
            nonce,
            page_title: None,
            show_cart: true,
            layout: LayoutVariant::default(),
            header_class: "",
            footer_class: "",
            has_collections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_classes() {
        assert_eq!(LayoutVariant::Default.main_class(), "flex-1");
        assert_eq!(LayoutVariant::FullWidth.main_class(), "flex-1 w-full");
        assert_eq!(
            LayoutVariant::Centered.main_class(),
            "flex-1 content-centered"
        );
    }
}
