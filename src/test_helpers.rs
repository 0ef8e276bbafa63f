//! Shared test utilities for the folio test suite.
//!
//! Builders for blog posts and content-store records, plus a fixture copier
//! for tests that need a real source directory on disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let blog = BlogCollection::load(&tmp.path().join("blog")).unwrap();
//!
//! let p = post("hello", "2023-05-01");
//! assert_eq!(p.url(), "/blog/hello/");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::blog::BlogPost;
use crate::content::SiteContent;
use crate::rich_text::RichText;
use crate::text::parse_date;
use crate::types::{AssetRef, Biography, FileAsset, ImageAsset, Project, Service, SocialLink, Technology};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write a schema-valid post to `dir/rel_path`, creating parent directories.
pub fn write_post(dir: &Path, rel_path: &str, title: &str, pub_date: &str) {
    let path = dir.join(rel_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let content = format!(
        "---\ntitle: {title}\ntags: [test]\nexcerpt: About {title}\npubDate: {pub_date}\n---\n\nBody of {title}.\n"
    );
    std::fs::write(path, content).unwrap();
}

// =========================================================================
// Builders
// =========================================================================

/// A minimal post with the given slug and publish date.
pub fn post(slug: &str, pub_date: &str) -> BlogPost {
    BlogPost {
        slug: slug.to_string(),
        title: format!("Post {slug}"),
        tags: vec!["test".to_string()],
        excerpt: format!("Excerpt of {slug}"),
        image: None,
        pub_date: parse_date(pub_date).unwrap(),
        updated_date: None,
        body: format!("Body of {slug}."),
    }
}

fn image(url: &str, alt: &str) -> ImageAsset {
    ImageAsset {
        asset: AssetRef {
            reference: None,
            url: Some(url.to_string()),
        },
        alt: Some(alt.to_string()),
    }
}

fn paragraph(text: &str) -> RichText {
    serde_json::from_value(serde_json::json!([
        { "_type": "block", "style": "normal", "children": [{ "_type": "span", "text": text }] }
    ]))
    .unwrap()
}

/// Content-store data for one fully populated site.
pub fn sample_content() -> SiteContent {
    SiteContent {
        biography: Some(Biography {
            short_bio: "Engineer who likes small tools.".to_string(),
            full_bio: paragraph("I build web things and write about them."),
            photo: Some(image("https://cdn.example/me.jpg", "Portrait")),
            resume: Some(FileAsset {
                asset: AssetRef {
                    reference: None,
                    url: Some("https://cdn.example/resume.pdf".to_string()),
                },
            }),
        }),
        social_links: vec![
            SocialLink {
                label: "GitHub".to_string(),
                url: "https://github.com/someone".to_string(),
                icon: None,
            },
            SocialLink {
                label: "LinkedIn".to_string(),
                url: "https://linkedin.com/in/someone".to_string(),
                icon: None,
            },
        ],
        services: vec![Service {
            title: "Web development".to_string(),
            excerpt: "Sites and services.".to_string(),
            icon: None,
        }],
        technologies: vec![
            Technology {
                name: "Rust".to_string(),
                category: Some("Languages".to_string()),
                icon: Some(image("https://cdn.example/rust.svg", "Rust")),
            },
            Technology {
                name: "PostgreSQL".to_string(),
                category: Some("Databases".to_string()),
                icon: None,
            },
        ],
        projects: vec![Project {
            title: "Folio".to_string(),
            slug: "folio".to_string(),
            excerpt: "This site.".to_string(),
            tags: vec!["rust".to_string()],
            url: Some("https://example.com".to_string()),
            repository: Some("https://github.com/someone/folio".to_string()),
            image: Some(image("https://cdn.example/folio.png", "Folio screenshot")),
            body: paragraph("Built with a static generator."),
        }],
    }
}
