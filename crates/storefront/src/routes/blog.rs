//! Blog pages rendered from the markdown content store.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::NaiveDate;
use tracing::instrument;

use crate::content::Post;
use crate::error::AppError;
use crate::filters;
use crate::middleware::CspNonce;
use crate::shell::ShellView;
use crate::state::AppState;

/// How many other posts to offer under an article.
const RECENT_POSTS_COUNT: usize = 3;

/// Post view for templates.
#[derive(Clone)]
pub struct PostView {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub published_at: NaiveDate,
    pub tags: Vec<String>,
    pub content_html: String,
    pub reading_time_minutes: u32,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.meta.title.clone(),
            description: post.meta.description.clone(),
            author: post.meta.author.clone(),
            published_at: post.meta.published_at,
            tags: post.meta.tags.clone(),
            content_html: post.content_html.clone(),
            reading_time_minutes: post.reading_time_minutes,
        }
    }
}

/// Blog index page template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/index.html")]
pub struct BlogIndexTemplate {
    pub shell: ShellView,
    pub posts: Vec<PostView>,
}

/// Blog post detail template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/show.html")]
pub struct BlogShowTemplate {
    pub shell: ShellView,
    pub post: PostView,
    pub recent_posts: Vec<PostView>,
}

/// Blog index listing every published post.
#[instrument(skip(state, nonce))]
pub async fn index(
    State(state): State<AppState>,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    BlogIndexTemplate {
        shell: ShellView::load(&state, nonce).await,
        posts: state
            .content()
            .get_published_posts()
            .map(Into::into)
            .collect(),
    }
}

/// A single post by slug.
///
/// # Errors
///
/// Returns 404 for unknown slugs and for drafts.
#[instrument(skip(state, nonce))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse, AppError> {
    let post = state
        .content()
        .get_post(&slug)
        .filter(|post| !post.meta.draft)
        .ok_or_else(|| AppError::NotFound(format!("blog post '{slug}'")))?;

    Ok(BlogShowTemplate {
        shell: ShellView::load(&state, nonce).await,
        post: post.into(),
        recent_posts: state
            .content()
            .get_recent_posts(RECENT_POSTS_COUNT, Some(&slug))
            .into_iter()
            .map(Into::into)
            .collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shell::LayoutVariant;

    fn shell() -> ShellView {
        ShellView {
            nonce: "test-nonce".to_string(),
            page_title: Some("Blog".to_string()),
            show_cart: true,
            layout: LayoutVariant::default(),
            header_class: "",
            footer_class: "",
            has_collections: false,
        }
    }

    fn sample_post(slug: &str, title: &str) -> PostView {
        PostView {
            slug: slug.to_string(),
            title: title.to_string(),
            description: Some("Three bright mocktails for hot afternoons.".to_string()),
            author: Some("Riley".to_string()),
            published_at: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            tags: vec!["recipes".to_string()],
            content_html: "<p>Shake well over ice.</p>".to_string(),
            reading_time_minutes: 4,
        }
    }

    #[test]
    fn test_index_renders_post_cards() {
        let html = BlogIndexTemplate {
            shell: shell(),
            posts: vec![sample_post("summer-sippers", "Summer Sippers")],
        }
        .render()
        .unwrap();

        assert!(html.contains("Summer Sippers"));
        assert!(html.contains("/blog/summer-sippers"));
        assert!(html.contains("4 min read"));
        assert!(html.contains("June 1, 2025"));
    }

    #[test]
    fn test_index_empty_state() {
        let html = BlogIndexTemplate {
            shell: shell(),
            posts: Vec::new(),
        }
        .render()
        .unwrap();

        assert!(html.contains("No posts yet"));
    }

    #[test]
    fn test_show_renders_content_and_recent() {
        let html = BlogShowTemplate {
            shell: shell(),
            post: sample_post("summer-sippers", "Summer Sippers"),
            recent_posts: vec![sample_post("zero-proof-basics", "Zero-Proof Basics")],
        }
        .render()
        .unwrap();

        assert!(html.contains("<p>Shake well over ice.</p>"));
        assert!(html.contains("Zero-Proof Basics"));
        assert!(html.contains("/blog/zero-proof-basics"));
    }
}
