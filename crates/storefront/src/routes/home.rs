//! Home page route handlers.
//!
//! The home page renders the hero, the collections grid, the filterable
//! product grid, and the newsletter section. The product grid is an HTMX
//! fragment: the page ships a skeleton that swaps itself for
//! `/fragments/products` on load, and the collection filter re-fetches the
//! same fragment with a `collection` query parameter.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use zeroproof_core::CollectionId;

use crate::commerce::types::{Collection, Product};
use crate::filters;
use crate::middleware::CspNonce;
use crate::routes::newsletter::NewsletterView;
use crate::shell::ShellView;
use crate::state::AppState;

/// Number of products shown in the home page grid (three desktop rows).
const PRODUCTS_LIMIT: i64 = 12;

// =============================================================================
// Hero Configuration (Static content)
// =============================================================================

/// A single stat chip under the hero CTA.
#[derive(Clone)]
pub struct HeroStat {
    pub value: &'static str,
    pub label: &'static str,
}

/// Hero section content.
#[derive(Clone)]
pub struct HeroContent {
    pub badge: &'static str,
    pub title_top: &'static str,
    pub title_accent: &'static str,
    pub description: &'static str,
    pub cta_text: &'static str,
    pub stats: [HeroStat; 3],
}

impl Default for HeroContent {
    fn default() -> Self {
        Self {
            badge: "Zero-Proof \u{2022} Full Flavor",
            title_top: "The Future of",
            title_accent: "Mocktails is Here",
            description: "Premium non-alcoholic spirits and ready-to-mix beverages. \
                          Experience sophisticated flavors without the alcohol.",
            cta_text: "Discover Flavors",
            stats: [
                HeroStat {
                    value: "0%",
                    label: "Alcohol",
                },
                HeroStat {
                    value: "100%",
                    label: "Flavor",
                },
                HeroStat {
                    value: "8+",
                    label: "Products",
                },
            ],
        }
    }
}

// =============================================================================
// Card Views
// =============================================================================

/// Collection display data for templates.
#[derive(Clone)]
pub struct CollectionCardView {
    pub id: String,
    /// URL-encoded id for fragment and filter links.
    pub id_encoded: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_alt: String,
    pub featured: bool,
}

impl From<&Collection> for CollectionCardView {
    fn from(collection: &Collection) -> Self {
        Self {
            id: collection.id.as_str().to_string(),
            id_encoded: urlencoding::encode(collection.id.as_str()).into_owned(),
            name: collection.name.clone(),
            description: collection.description.clone(),
            image_url: collection.image.as_ref().map(|img| img.url.clone()),
            image_alt: collection.name.clone(),
            featured: collection.featured,
        }
    }
}

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub name: String,
    pub description: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub image_url: Option<String>,
    pub image_alt: String,
    pub available: bool,
    pub variant_id: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            compare_at_price: product
                .compare_at_price
                .as_ref()
                .filter(|compare| compare.amount > product.price.amount)
                .map(ToString::to_string),
            image_url: product.image.as_ref().map(|img| img.url.clone()),
            image_alt: product
                .image
                .as_ref()
                .and_then(|img| img.alt_text.clone())
                .unwrap_or_else(|| product.name.clone()),
            available: product.available,
            variant_id: product.variant_id.as_str().to_string(),
        }
    }
}

// =============================================================================
// Products Section Header
// =============================================================================

/// Header state for the products section.
///
/// The eyebrow and heading switch based on whether a collection filter is
/// active, and "View All" only renders while filtered.
#[derive(Clone)]
pub struct ProductsHeaderView {
    pub eyebrow: String,
    pub heading: String,
    pub show_view_all: bool,
    /// Fragment URL the grid loads itself from.
    pub fragment_url: String,
}

impl ProductsHeaderView {
    /// Build the header for the current filter selection.
    ///
    /// An unknown collection id keeps the filtered layout but falls back to
    /// a plain "Products" eyebrow.
    #[must_use]
    pub fn for_selection(selected: Option<&str>, collections: &[Collection]) -> Self {
        selected.map_or_else(
            || Self {
                eyebrow: "Featured Products".to_string(),
                heading: "Zero-Proof Excellence".to_string(),
                show_view_all: false,
                fragment_url: "/fragments/products".to_string(),
            },
            |id| Self {
                eyebrow: collections
                    .iter()
                    .find(|c| c.id.as_str() == id)
                    .map_or_else(|| "Products".to_string(), |c| c.name.clone()),
                heading: "Collection Highlights".to_string(),
                show_view_all: true,
                fragment_url: format!("/fragments/products?collection={}", urlencoding::encode(id)),
            },
        )
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub shell: ShellView,
    pub hero: HeroContent,
    pub collections: Vec<CollectionCardView>,
    pub section: ProductsHeaderView,
    pub newsletter: NewsletterView,
}

/// Products section fragment template (for HTMX).
///
/// Replaces the whole `#products` section so a filter change updates the
/// header and the grid in one swap.
#[derive(Template, WebTemplate)]
#[template(path = "partials/products_section.html")]
pub struct ProductsSectionTemplate {
    pub section: ProductsHeaderView,
    pub products: Vec<ProductCardView>,
}

/// Query parameters for the home page and the products fragment.
#[derive(Debug, Deserialize)]
pub struct ProductFilterQuery {
    pub collection: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the home page.
#[instrument(skip(state, nonce))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<ProductFilterQuery>,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    // Collections section omits itself when the list is empty or the fetch
    // fails; the rest of the page still renders.
    let collections = state.commerce().list_collections().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch collections: {e}");
            Vec::new()
        },
        |collections| collections,
    );

    let section = ProductsHeaderView::for_selection(query.collection.as_deref(), &collections);

    let mut shell = ShellView::load(&state, nonce).await;
    shell.has_collections = !collections.is_empty();

    HomeTemplate {
        shell,
        hero: HeroContent::default(),
        collections: collections.iter().map(CollectionCardView::from).collect(),
        section,
        newsletter: NewsletterView::default(),
    }
}

/// Products section fragment (HTMX).
#[instrument(skip(state))]
pub async fn products_fragment(
    State(state): State<AppState>,
    Query(query): Query<ProductFilterQuery>,
) -> impl IntoResponse {
    let collections = state.commerce().list_collections().await.map_or_else(
        |e| {
            tracing::warn!("Failed to fetch collections for section header: {e}");
            Vec::new()
        },
        |collections| collections,
    );

    let selected = query.collection.as_deref().map(CollectionId::from);
    let products = state
        .commerce()
        .get_products(selected.as_ref(), PRODUCTS_LIMIT)
        .await
        .map_or_else(
            |e| {
                tracing::error!("Failed to fetch products: {e}");
                Vec::new()
            },
            |products| products,
        );

    ProductsSectionTemplate {
        section: ProductsHeaderView::for_selection(query.collection.as_deref(), &collections),
        products: products.iter().map(ProductCardView::from).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use zeroproof_core::{CurrencyCode, Money, ProductId, VariantId};

    fn sample_collection(id: &str, name: &str) -> Collection {
        Collection {
            id: CollectionId::from(id),
            name: name.to_string(),
            description: Some("Bright, fizzy, zero-proof.".to_string()),
            image: None,
            featured: false,
        }
    }

    fn sample_product(name: &str) -> Product {
        Product {
            id: ProductId::from("prod-1"),
            name: name.to_string(),
            description: "A crisp highball without the hangover.".to_string(),
            price: Money::new(Decimal::new(2400, 2), CurrencyCode::USD),
            compare_at_price: None,
            image: None,
            available: true,
            variant_id: VariantId::from("var-1"),
        }
    }

    fn shell() -> ShellView {
        ShellView {
            nonce: "test-nonce".to_string(),
            page_title: None,
            show_cart: true,
            layout: crate::shell::LayoutVariant::default(),
            header_class: "",
            footer_class: "",
            has_collections: true,
        }
    }

    fn home_template(
        collections: Vec<CollectionCardView>,
        section: ProductsHeaderView,
    ) -> HomeTemplate {
        HomeTemplate {
            shell: shell(),
            hero: HeroContent::default(),
            collections,
            section,
            newsletter: NewsletterView::default(),
        }
    }

    #[test]
    fn test_header_unfiltered() {
        let header = ProductsHeaderView::for_selection(None, &[sample_collection("c1", "Fizz")]);
        assert_eq!(header.eyebrow, "Featured Products");
        assert_eq!(header.heading, "Zero-Proof Excellence");
        assert!(!header.show_view_all);
    }

    #[test]
    fn test_header_filtered_known_collection() {
        let header =
            ProductsHeaderView::for_selection(Some("c1"), &[sample_collection("c1", "Fizz")]);
        assert_eq!(header.eyebrow, "Fizz");
        assert_eq!(header.heading, "Collection Highlights");
        assert!(header.show_view_all);
        assert_eq!(header.fragment_url, "/fragments/products?collection=c1");
    }

    #[test]
    fn test_header_filtered_unknown_collection_falls_back() {
        let header =
            ProductsHeaderView::for_selection(Some("ghost"), &[sample_collection("c1", "Fizz")]);
        assert_eq!(header.eyebrow, "Products");
        assert_eq!(header.heading, "Collection Highlights");
        assert!(header.show_view_all);
    }

    #[test]
    fn test_home_renders_eight_skeleton_blocks() {
        let html = home_template(
            vec![CollectionCardView::from(&sample_collection("c1", "Fizz"))],
            ProductsHeaderView::for_selection(None, &[]),
        )
        .render()
        .unwrap();

        assert_eq!(html.matches("animate-pulse").count(), 8);
    }

    #[test]
    fn test_home_omits_collections_section_when_empty() {
        let html = home_template(Vec::new(), ProductsHeaderView::for_selection(None, &[]))
            .render()
            .unwrap();

        assert!(!html.contains("Explore Our Range"));
        assert!(!html.contains("id=\"collections\""));
    }

    #[test]
    fn test_home_renders_collections_section_when_present() {
        let html = home_template(
            vec![CollectionCardView::from(&sample_collection("c1", "Fizz"))],
            ProductsHeaderView::for_selection(None, &[]),
        )
        .render()
        .unwrap();

        assert!(html.contains("Explore Our Range"));
        assert!(html.contains("Fizz"));
        assert!(html.contains("Explore Collection"));
    }

    #[test]
    fn test_home_renders_hero_copy() {
        let html = home_template(Vec::new(), ProductsHeaderView::for_selection(None, &[]))
            .render()
            .unwrap();

        assert!(html.contains("The Future of"));
        assert!(html.contains("Mocktails is Here"));
        assert!(html.contains("Discover Flavors"));
        assert!(html.contains("0%"));
        assert!(html.contains("100%"));
    }

    #[test]
    fn test_home_renders_newsletter_form() {
        let html = home_template(Vec::new(), ProductsHeaderView::for_selection(None, &[]))
            .render()
            .unwrap();

        assert!(html.contains("Stay in the Loop"));
        assert!(html.contains("/newsletter/subscribe"));
        assert!(html.contains("your@email.com"));
    }

    #[test]
    fn test_shell_page_title_band() {
        let mut template = home_template(Vec::new(), ProductsHeaderView::for_selection(None, &[]));
        template.shell.page_title = Some("Our Story".to_string());
        let html = template.render().unwrap();
        assert!(html.contains("<h1>Our Story</h1>"));

        let html = home_template(Vec::new(), ProductsHeaderView::for_selection(None, &[]))
            .render()
            .unwrap();
        assert!(!html.contains("page-title"));
    }

    #[test]
    fn test_shell_hides_cart_when_disabled() {
        let mut template = home_template(Vec::new(), ProductsHeaderView::for_selection(None, &[]));
        template.shell.show_cart = false;
        let html = template.render().unwrap();

        assert!(!html.contains("cart-toggle"));
        assert!(!html.contains("cart-drawer-mount"));
        assert!(!html.contains("View cart"));
    }

    #[test]
    fn test_fragment_filtered_shows_view_all() {
        let collections = vec![sample_collection("c1", "Fizz")];
        let html = ProductsSectionTemplate {
            section: ProductsHeaderView::for_selection(Some("c1"), &collections),
            products: vec![ProductCardView::from(&sample_product("Citrus Spritz"))],
        }
        .render()
        .unwrap();

        assert!(html.contains("Collection Highlights"));
        assert!(html.contains("View All"));
        assert!(html.contains("Citrus Spritz"));
        assert!(html.contains("$24.00"));
    }

    #[test]
    fn test_fragment_unfiltered_has_no_view_all() {
        let html = ProductsSectionTemplate {
            section: ProductsHeaderView::for_selection(None, &[]),
            products: vec![ProductCardView::from(&sample_product("Citrus Spritz"))],
        }
        .render()
        .unwrap();

        assert!(html.contains("Zero-Proof Excellence"));
        assert!(!html.contains("View All"));
    }

    #[test]
    fn test_fragment_empty_renders_empty_message() {
        let html = ProductsSectionTemplate {
            section: ProductsHeaderView::for_selection(None, &[]),
            products: Vec::new(),
        }
        .render()
        .unwrap();

        assert!(html.contains("No products available in this collection."));
        assert_eq!(html.matches("animate-pulse").count(), 0);
    }

    #[test]
    fn test_product_card_compare_at_price_only_when_higher() {
        let mut product = sample_product("Citrus Spritz");
        product.compare_at_price = Some(Money::new(Decimal::new(1900, 2), CurrencyCode::USD));
        assert!(ProductCardView::from(&product).compare_at_price.is_none());

        product.compare_at_price = Some(Money::new(Decimal::new(2900, 2), CurrencyCode::USD));
        assert_eq!(
            ProductCardView::from(&product).compare_at_price.as_deref(),
            Some("$29.00")
        );
    }
}
