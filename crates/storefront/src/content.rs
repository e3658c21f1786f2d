//! File-based blog content.
//!
//! Posts live as markdown files under `content/blog`, one file per post with
//! YAML frontmatter. Everything is read once at startup and served from
//! memory; publishing a post is a deploy.

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Frontmatter metadata for a blog post.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    pub published_at: NaiveDate,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Drafts load into the store but the routes treat them as unpublished.
    #[serde(default)]
    pub draft: bool,
}

/// A post with its markdown already rendered to HTML.
#[derive(Debug, Clone)]
pub struct Post {
    pub slug: String,
    pub meta: PostMeta,
    pub content_html: String,
    pub reading_time_minutes: u32,
}

/// In-memory post collection, sorted newest first.
#[derive(Debug, Clone)]
pub struct ContentStore {
    posts: Arc<Vec<Post>>,
}

impl ContentStore {
    /// Load all content from the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the content directory cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let posts = Self::load_posts(&content_dir.join("blog"))?;

        Ok(Self {
            posts: Arc::new(posts),
        })
    }

    fn load_posts(dir: &Path) -> Result<Vec<Post>, ContentError> {
        if !dir.is_dir() {
            tracing::warn!("Blog directory does not exist: {:?}", dir);
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;
        let mut posts: Vec<Post> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
            .filter_map(|path| match Self::load_post(&path) {
                Ok(post) => Some(post),
                Err(e) => {
                    // A broken post should not take the whole site down
                    tracing::error!("Skipping post {:?}: {}", path, e);
                    None
                }
            })
            .collect();

        posts.sort_by(|a, b| b.meta.published_at.cmp(&a.meta.published_at));
        tracing::info!(count = posts.len(), "Loaded blog posts");

        Ok(posts)
    }

    fn load_post(path: &Path) -> Result<Post, ContentError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?;

        let parsed: ParsedEntity<PostMeta> = Matter::<YAML>::new()
            .parse(&raw)
            .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
        let meta = parsed
            .data
            .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

        Ok(Post {
            slug: strip_date_prefix(stem).to_string(),
            meta,
            content_html: render_markdown(&parsed.content),
            reading_time_minutes: reading_time(&parsed.content),
        })
    }

    /// Look up a post by slug, drafts included.
    #[must_use]
    pub fn get_post(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// All published posts, newest first.
    pub fn get_published_posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| !p.meta.draft)
    }

    /// The most recent published posts, optionally excluding one slug.
    #[must_use]
    pub fn get_recent_posts(&self, limit: usize, exclude_slug: Option<&str>) -> Vec<&Post> {
        self.get_published_posts()
            .filter(|p| exclude_slug.is_none_or(|s| p.slug != s))
            .take(limit)
            .collect()
    }
}

/// Strip a leading `YYYY-MM-DD-` prefix from a file stem.
///
/// Post files carry a date prefix so directory listings sort chronologically;
/// the public slug drops it.
fn strip_date_prefix(stem: &str) -> &str {
    stem.get(..11)
        .filter(|prefix| prefix.chars().nth(4) == Some('-'))
        .and_then(|_| stem.get(11..))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(stem)
}

/// Estimated minutes to read at 200 words per minute, never below one.
fn reading_time(body: &str) -> u32 {
    let minutes = body.split_whitespace().count().div_ceil(200);
    u32::try_from(minutes).unwrap_or(u32::MAX).max(1)
}

/// Render markdown to HTML with the GFM extensions enabled.
fn render_markdown(body: &str) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    options.extension.footnotes = true;
    options.extension.superscript = true;
    options.extension.header_ids = Some(String::new());
    // Posts are first-party content, so raw HTML passes through unsanitized
    options.render.r#unsafe = true;

    markdown_to_html(body, &options)
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_post(dir: &Path, name: &str, body: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(body.as_bytes()).unwrap();
    }

    fn temp_blog_dir(test_name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir()
            .join("zeroproof-content-tests")
            .join(test_name)
            .join("blog");
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_strip_date_prefix_variants() {
        assert_eq!(strip_date_prefix("2025-01-15-my-post"), "my-post");
        assert_eq!(strip_date_prefix("undated-post"), "undated-post");
        assert_eq!(strip_date_prefix("2025-01-15-"), "2025-01-15-");
        assert_eq!(strip_date_prefix("short"), "short");
    }

    #[test]
    fn test_reading_time_rounds_up() {
        assert_eq!(reading_time(""), 1);
        assert_eq!(reading_time("one two three"), 1);
        assert_eq!(reading_time(&"word ".repeat(201)), 2);
    }

    #[test]
    fn test_render_markdown_gfm() {
        let html = render_markdown("~~shaken~~ **stirred**");
        assert!(html.contains("<del>shaken</del>"));
        assert!(html.contains("<strong>stirred</strong>"));
    }

    #[test]
    fn test_slug_strips_date_prefix() {
        let dir = temp_blog_dir("slug");
        write_post(
            &dir,
            "2025-06-01-first-pour.md",
            "---\ntitle: First Pour\npublished_at: 2025-06-01\n---\nHello.",
        );

        let store = ContentStore::load(dir.parent().unwrap()).unwrap();
        assert!(store.get_post("first-pour").is_some());
        assert!(store.get_post("2025-06-01-first-pour").is_none());
    }

    #[test]
    fn test_drafts_are_hidden() {
        let dir = temp_blog_dir("drafts");
        write_post(
            &dir,
            "2025-06-02-published.md",
            "---\ntitle: Published\npublished_at: 2025-06-02\n---\nBody.",
        );
        write_post(
            &dir,
            "2025-06-03-hidden.md",
            "---\ntitle: Hidden\npublished_at: 2025-06-03\ndraft: true\n---\nBody.",
        );

        let store = ContentStore::load(dir.parent().unwrap()).unwrap();
        let published: Vec<_> = store.get_published_posts().collect();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].slug, "published");

        // Drafts stay addressable for previewing but never list
        assert!(store.get_post("hidden").is_some());
        assert!(store.get_recent_posts(10, None).len() == 1);
    }

    #[test]
    fn test_reading_time_minimum_one_minute() {
        let dir = temp_blog_dir("reading-time");
        write_post(
            &dir,
            "2025-06-04-short.md",
            "---\ntitle: Short\npublished_at: 2025-06-04\n---\nTiny.",
        );

        let store = ContentStore::load(dir.parent().unwrap()).unwrap();
        assert_eq!(store.get_post("short").unwrap().reading_time_minutes, 1);
    }

    #[test]
    fn test_posts_sorted_newest_first() {
        let dir = temp_blog_dir("sorting");
        write_post(
            &dir,
            "2025-01-01-older.md",
            "---\ntitle: Older\npublished_at: 2025-01-01\n---\nBody.",
        );
        write_post(
            &dir,
            "2025-03-01-newer.md",
            "---\ntitle: Newer\npublished_at: 2025-03-01\n---\nBody.",
        );

        let store = ContentStore::load(dir.parent().unwrap()).unwrap();
        let slugs: Vec<_> = store.get_published_posts().map(|p| p.slug.clone()).collect();
        assert_eq!(slugs, vec!["newer".to_string(), "older".to_string()]);
    }

    #[test]
    fn test_missing_directory_is_empty_store() {
        let missing = std::env::temp_dir().join("zeroproof-content-tests/does-not-exist");
        let store = ContentStore::load(&missing).unwrap();
        assert_eq!(store.get_published_posts().count(), 0);
    }
}
