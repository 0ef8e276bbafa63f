//! CLI output formatting for `build` and `check`.
//!
//! Output is a content inventory: every entity is shown by positional index
//! and title, with secondary details on indented context lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Config
//!     Site: Portfolio
//!     Content store: 4778um7r/production (cdn)
//!     Contact: owner@example.com via smtp.example.com:465
//!
//! Blog (2 posts)
//! 001 Moving to Rust
//!     Published: May 1, 2023
//!     URL: /blog/astro-to-rust/
//! 002 Hello world
//!     Published: January 15, 2021
//!     URL: /blog/hello-world/
//! ```
//!
//! ## Build
//!
//! ```text
//! Content
//!     Biography: yes
//!     Social links: 2
//!     Services: 1
//!     Technologies: 2
//!     Projects: 1
//!
//! Pages
//! 001 Home → index.html
//! 002 About → about/index.html
//!
//! Posts
//! 001 Moving to Rust → blog/astro-to-rust/index.html
//!
//! Generated 2 pages, 1 post in dist
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::blog::BlogCollection;
use crate::config::SiteConfig;
use crate::content::SiteContent;
use crate::generate::{BuildReport, GeneratedPage};
use crate::text::long_date;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn page_lines(pages: &[GeneratedPage]) -> Vec<String> {
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| format!("{} {} → {}", format_index(i + 1), page.title, page.path))
        .collect()
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(config: &SiteConfig, blog: &BlogCollection) -> Vec<String> {
    let store = &config.content_store;
    let mut lines = vec![
        "Config".to_string(),
        format!("{}Site: {}", indent(1), config.site.title),
        format!(
            "{}Content store: {}/{} ({})",
            indent(1),
            store.project_id,
            store.dataset,
            if store.use_cdn { "cdn" } else { "live" }
        ),
    ];

    let smtp = &config.smtp;
    if smtp.host.is_empty() {
        lines.push(format!("{}Contact: {} (smtp not configured)", indent(1), config.contact.recipient));
    } else {
        lines.push(format!(
            "{}Contact: {} via {}:{}",
            indent(1),
            config.contact.recipient,
            smtp.host,
            smtp.port
        ));
    }

    lines.push(String::new());
    lines.push(format!("Blog ({})", plural(blog.len(), "post")));
    for (i, post) in blog.posts().iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), post.title));
        lines.push(format!("{}Published: {}", indent(1), long_date(&post.pub_date)));
        if let Some(updated) = &post.updated_date {
            lines.push(format!("{}Updated: {}", indent(1), long_date(updated)));
        }
        lines.push(format!("{}URL: {}", indent(1), post.url()));
    }
    lines
}

pub fn print_check_output(config: &SiteConfig, blog: &BlogCollection) {
    for line in format_check_output(config, blog) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_content_output(content: &SiteContent) -> Vec<String> {
    vec![
        "Content".to_string(),
        format!(
            "{}Biography: {}",
            indent(1),
            if content.biography.is_some() { "yes" } else { "no" }
        ),
        format!("{}Social links: {}", indent(1), content.social_links.len()),
        format!("{}Services: {}", indent(1), content.services.len()),
        format!("{}Technologies: {}", indent(1), content.technologies.len()),
        format!("{}Projects: {}", indent(1), content.projects.len()),
    ]
}

pub fn format_build_output(report: &BuildReport, output_dir: &Path) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    lines.extend(page_lines(&report.pages));

    if !report.posts.is_empty() {
        lines.push(String::new());
        lines.push("Posts".to_string());
        lines.extend(page_lines(&report.posts));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {} in {}",
        plural(report.pages.len(), "page"),
        plural(report.posts.len(), "post"),
        output_dir.display()
    ));
    lines
}

pub fn print_build_output(content: &SiteContent, report: &BuildReport, output_dir: &Path) {
    for line in format_content_output(content) {
        println!("{}", line);
    }
    println!();
    for line in format_build_output(report, output_dir) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn plural_handles_one() {
        assert_eq!(plural(1, "post"), "1 post");
        assert_eq!(plural(0, "post"), "0 posts");
        assert_eq!(plural(3, "page"), "3 pages");
    }

    #[test]
    fn check_lists_config_and_posts() {
        let mut config = SiteConfig::default();
        config.smtp.host = "smtp.example.com".to_string();
        let mut first = post("newer", "2023-05-01");
        first.updated_date = Some(crate::text::parse_date("2023-06-10").unwrap());
        let blog = BlogCollection::new(vec![first, post("older", "2021-01-15")]);

        let lines = format_check_output(&config, &blog);
        assert_eq!(lines[0], "Config");
        assert_eq!(lines[1], "    Site: Portfolio");
        assert_eq!(lines[2], "    Content store: 4778um7r/production (cdn)");
        assert_eq!(
            lines[3],
            "    Contact: Site Owner <owner@example.com> via smtp.example.com:465"
        );
        assert!(lines.contains(&"Blog (2 posts)".to_string()));
        assert!(lines.contains(&"001 Post newer".to_string()));
        assert!(lines.contains(&"    Updated: June 10, 2023".to_string()));
        assert!(lines.contains(&"    URL: /blog/older/".to_string()));
    }

    #[test]
    fn check_flags_missing_smtp() {
        let lines = format_check_output(&SiteConfig::default(), &BlogCollection::default());
        assert!(lines[3].ends_with("(smtp not configured)"));
        assert_eq!(lines.last().unwrap(), "Blog (0 posts)");
    }

    #[test]
    fn content_summary_counts_sections() {
        let lines = format_content_output(&sample_content());
        assert_eq!(
            lines,
            vec![
                "Content",
                "    Biography: yes",
                "    Social links: 2",
                "    Services: 1",
                "    Technologies: 2",
                "    Projects: 1",
            ]
        );
    }

    #[test]
    fn build_lists_pages_posts_and_totals() {
        let report = BuildReport {
            pages: vec![
                GeneratedPage {
                    title: "Home".to_string(),
                    path: "index.html".to_string(),
                },
                GeneratedPage {
                    title: "About".to_string(),
                    path: "about/index.html".to_string(),
                },
            ],
            posts: vec![GeneratedPage {
                title: "Hello".to_string(),
                path: "blog/hello/index.html".to_string(),
            }],
        };
        let lines = format_build_output(&report, Path::new("dist"));
        assert_eq!(
            lines,
            vec![
                "Pages",
                "001 Home → index.html",
                "002 About → about/index.html",
                "",
                "Posts",
                "001 Hello → blog/hello/index.html",
                "",
                "Generated 2 pages, 1 post in dist",
            ]
        );
    }

    #[test]
    fn build_without_posts_omits_section() {
        let report = BuildReport::default();
        let lines = format_build_output(&report, Path::new("out"));
        assert!(!lines.contains(&"Posts".to_string()));
        assert_eq!(lines.last().unwrap(), "Generated 0 pages, 0 posts in out");
    }
}
