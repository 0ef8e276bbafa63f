//! Local blog collection.
//!
//! Blog posts are markdown files under the blog directory, each opening with
//! YAML front matter:
//!
//! ```text
//! blog/
//! ├── first-post.md
//! └── notes/
//!     └── rust-in-production.md
//! ```
//!
//! ```yaml
//! ---
//! title: Rust in production
//! tags: [rust, ops]
//! excerpt: What a year of running Rust services taught me.
//! image: /images/rust.webp       # optional
//! pubDate: 2023-05-01            # required, string coerced to a date
//! updatedDate: 2023-06-10        # optional
//! ---
//! ```
//!
//! ## Schema
//!
//! The front matter is validated strictly when the collection loads. A post
//! with a missing required field, a wrongly typed field, or a date that does
//! not parse fails the whole load with [`BlogError::Schema`] naming the file.
//! Text fields must be YAML strings: `title: ~`, `excerpt: 42` or a bare
//! `title:` are rejected rather than coerced. Keys outside the schema are
//! ignored. An empty or null `updatedDate` or `image` counts as absent.
//!
//! ## Ordering
//!
//! Collection order is path order. [`BlogCollection::latest`] sorts
//! most-recent-first by `pubDate` (stable, so equal dates keep collection
//! order) and keeps 5; [`BlogCollection::recent`] keeps the first 4 of that.

use crate::text::{self, slugify};
use chrono::{DateTime, Utc};
use pulldown_cmark::{Parser, html as md_html};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Posts kept by [`BlogCollection::latest`].
pub const LATEST_LIMIT: usize = 5;
/// Posts kept by [`BlogCollection::recent`].
pub const RECENT_LIMIT: usize = 4;

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("No front matter in {0}")]
    MissingFrontmatter(PathBuf),
    #[error("Invalid front matter in {path}: {message}")]
    Schema { path: PathBuf, message: String },
    #[error("Duplicate post slug {0:?} in {1}")]
    DuplicateSlug(String, PathBuf),
}

/// Front matter exactly as written, before date coercion.
///
/// YAML would happily turn `~`, `42` or an empty value into a string, so
/// every text field goes through [`strict_string`] and only accepts a YAML
/// string scalar.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFrontmatter {
    #[serde(deserialize_with = "strict_string")]
    title: String,
    #[serde(deserialize_with = "strict_strings")]
    tags: Vec<String>,
    #[serde(deserialize_with = "strict_string")]
    excerpt: String,
    #[serde(default, deserialize_with = "optional_string")]
    image: Option<String>,
    #[serde(deserialize_with = "strict_string")]
    pub_date: String,
    #[serde(default, deserialize_with = "optional_string")]
    updated_date: Option<String>,
}

fn yaml_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn expect_string<E: de::Error>(value: Value) -> Result<String, E> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(E::custom(format!(
            "expected a string, found {}",
            yaml_kind(&other)
        ))),
    }
}

fn strict_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    expect_string(Value::deserialize(deserializer)?)
}

/// Like [`strict_string`], but an explicit null counts as absent.
fn optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        other => expect_string(other).map(Some),
    }
}

fn strict_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Sequence(items) => items.into_iter().map(expect_string).collect(),
        other => Err(de::Error::custom(format!(
            "expected a list of strings, found {}",
            yaml_kind(&other)
        ))),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    pub tags: Vec<String>,
    pub excerpt: String,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub updated_date: Option<DateTime<Utc>>,
    /// Markdown body after the front matter.
    pub body: String,
}

impl BlogPost {
    /// Render the markdown body to HTML.
    pub fn body_html(&self) -> String {
        let parser = Parser::new(&self.body);
        let mut html = String::new();
        md_html::push_html(&mut html, parser);
        html
    }

    /// Site-relative URL of the post page.
    pub fn url(&self) -> String {
        format!("/blog/{}/", self.slug)
    }
}

/// Split `---` delimited front matter from the body.
fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();
    let after_open = content.strip_prefix("---")?;
    let close = after_open.find("\n---")?;
    let frontmatter = &after_open[..close];
    let rest = &after_open[close + "\n---".len()..];
    // Drop the remainder of the closing delimiter line.
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or("");
    Some((frontmatter, body))
}

/// Parse and validate one post. `path` is used for the slug and for errors.
pub fn parse_post(path: &Path, content: &str) -> Result<BlogPost, BlogError> {
    let schema_err = |message: String| BlogError::Schema {
        path: path.to_path_buf(),
        message,
    };

    let (frontmatter, body) =
        split_frontmatter(content).ok_or_else(|| BlogError::MissingFrontmatter(path.to_path_buf()))?;
    let raw: RawFrontmatter =
        serde_yaml::from_str(frontmatter).map_err(|e| schema_err(e.to_string()))?;

    let pub_date =
        text::parse_date(&raw.pub_date).map_err(|e| schema_err(format!("pubDate: {e}")))?;
    let updated_date = match raw.updated_date.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => {
            Some(text::parse_date(s).map_err(|e| schema_err(format!("updatedDate: {e}")))?)
        }
        _ => None,
    };

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let slug = slugify(&stem);
    if slug.is_empty() {
        return Err(schema_err(format!("file name {stem:?} does not produce a slug")));
    }

    Ok(BlogPost {
        slug,
        title: raw.title,
        tags: raw.tags,
        excerpt: raw.excerpt,
        image: raw.image.filter(|s| !s.trim().is_empty()),
        pub_date,
        updated_date,
        body: body.trim_start_matches(['\r', '\n']).to_string(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct BlogCollection {
    posts: Vec<BlogPost>,
}

impl BlogCollection {
    /// Wrap already-parsed posts, keeping their order as collection order.
    pub fn new(posts: Vec<BlogPost>) -> Self {
        Self { posts }
    }

    /// Load every `.md` post under `dir`. A missing directory is an empty blog.
    pub fn load(dir: &Path) -> Result<Self, BlogError> {
        if !dir.exists() {
            tracing::warn!(dir = %dir.display(), "blog directory not found, no posts loaded");
            return Ok(Self::default());
        }

        let mut posts = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            let is_markdown = path
                .extension()
                .map(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"))
                .unwrap_or(false);
            if !entry.file_type().is_file() || !is_markdown {
                continue;
            }

            let content = fs::read_to_string(path)?;
            let post = parse_post(path, &content)?;
            if seen.insert(post.slug.clone(), path.to_path_buf()).is_some() {
                return Err(BlogError::DuplicateSlug(post.slug, path.to_path_buf()));
            }
            tracing::debug!(slug = %post.slug, "loaded post");
            posts.push(post);
        }

        tracing::info!(count = posts.len(), "loaded blog collection");
        Ok(Self { posts })
    }

    /// All posts in collection order.
    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// The five most recently published posts, newest first.
    pub fn latest(&self) -> Vec<&BlogPost> {
        text::latest(self.posts.iter().collect(), LATEST_LIMIT, |p| p.pub_date)
    }

    /// The first four of [`latest`](Self::latest).
    pub fn recent(&self) -> Vec<&BlogPost> {
        let mut posts = self.latest();
        posts.truncate(RECENT_LIMIT);
        posts
    }
}
