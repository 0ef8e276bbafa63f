//! HTML site generation.
//!
//! Takes the fetched content-store sections, the local blog collection and
//! the site config, and writes the final static site.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): short bio, photo, social links, services,
//!   technologies and the most recent posts
//! - **About** (`/about/index.html`): full biography (rich text) and resume link
//! - **Projects** (`/projects/index.html`): project cards with rich-text bodies
//! - **Blog index** (`/blog/index.html`): the latest posts
//! - **Posts** (`/blog/{slug}/index.html`): one page per markdown post
//! - **Contact** (`/contact/index.html`): form posting to the contact relay
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── style.css
//! ├── about/index.html
//! ├── projects/index.html
//! ├── contact/index.html
//! └── blog/
//!     ├── index.html
//!     └── hello-world/index.html
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (colors injected from config)
//! - `static/contact.js`: Contact form submission
//!
//! Animation scripts are built per page by [`crate::animation`].

use crate::animation::{self, Animation};
use crate::blog::{BlogCollection, BlogPost};
use crate::config::{self, SiteConfig};
use crate::content::SiteContent;
use crate::image_url::ImageUrlBuilder;
use crate::rich_text::{RichTextRenderer, render_link};
use crate::server::CONTACT_ROUTE;
use crate::text::long_date;
use crate::types::{ImageAsset, Project, Technology};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const CONTACT_JS: &str = include_str!("../static/contact.js");

/// One page written to the output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    pub title: String,
    /// Path relative to the output directory.
    pub path: String,
}

/// What a build wrote, for CLI reporting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub pages: Vec<GeneratedPage>,
    pub posts: Vec<GeneratedPage>,
}

/// Top-level sections, in navigation order: (title, href, key).
const SECTIONS: &[(&str, &str, &str)] = &[
    ("Home", "/", "home"),
    ("About", "/about/", "about"),
    ("Projects", "/projects/", "projects"),
    ("Blog", "/blog/", "blog"),
    ("Contact", "/contact/", "contact"),
];

/// Shared state for every page renderer.
struct Site<'a> {
    config: &'a SiteConfig,
    content: &'a SiteContent,
    blog: &'a BlogCollection,
    images: ImageUrlBuilder,
    rich_text: RichTextRenderer,
}

impl<'a> Site<'a> {
    fn new(config: &'a SiteConfig, content: &'a SiteContent, blog: &'a BlogCollection) -> Self {
        let images = ImageUrlBuilder::new(
            config.content_store.project_id.clone(),
            config.content_store.dataset.clone(),
        );
        Self {
            config,
            content,
            blog,
            rich_text: RichTextRenderer::new(images.clone()),
            images,
        }
    }

    /// Animation script for a page, or nothing when animations are disabled.
    fn animations(&self, animations: &[Animation]) -> Markup {
        if !self.config.animations.enabled {
            return html! {};
        }
        animation::render_script(&self.config.animations.gsap_base, animations)
    }

    fn page_title(&self, title: &str) -> String {
        if title.is_empty() {
            self.config.site.title.clone()
        } else {
            format!("{} | {}", title, self.config.site.title)
        }
    }
}

pub fn generate(
    content: &SiteContent,
    blog: &BlogCollection,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<BuildReport, GenerateError> {
    let site = Site::new(config, content, blog);
    let mut report = BuildReport::default();

    fs::create_dir_all(output_dir)?;

    // Generate CSS with colors from config
    let color_css = config::generate_color_css(&config.colors);
    fs::write(output_dir.join("style.css"), format!("{color_css}\n\n{CSS_STATIC}"))?;

    let pages = [
        ("Home", "index.html", render_index(&site)),
        ("About", "about/index.html", render_about_page(&site)),
        ("Projects", "projects/index.html", render_projects_page(&site)),
        ("Blog", "blog/index.html", render_blog_index(&site)),
        ("Contact", "contact/index.html", render_contact_page(&site)),
    ];
    for (title, path, markup) in pages {
        write_page(output_dir, path, markup)?;
        tracing::debug!(path, "generated page");
        report.pages.push(GeneratedPage {
            title: title.to_string(),
            path: path.to_string(),
        });
    }

    for post in blog.posts() {
        let path = format!("blog/{}/index.html", post.slug);
        write_page(output_dir, &path, render_post_page(&site, post))?;
        report.posts.push(GeneratedPage {
            title: post.title.clone(),
            path,
        });
    }

    tracing::info!(
        pages = report.pages.len(),
        posts = report.posts.len(),
        dir = %output_dir.display(),
        "site generated"
    );
    Ok(report)
}

fn write_page(output_dir: &Path, rel_path: &str, markup: Markup) -> std::io::Result<()> {
    let path = output_dir.join(rel_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, markup.into_string())
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure. `path` is the page's
/// site-relative URL, used for the canonical link.
fn base_document(
    site: &Site,
    title: &str,
    path: &str,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    let canonical = format!("{}{}", site.config.site.base_url.trim_end_matches('/'), path);
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content=(site.config.site.description);
                title { (site.page_title(title)) }
                link rel="canonical" href=(canonical);
                link rel="stylesheet" href="/style.css";
            }
            body class=[body_class] {
                (site_header(site, body_class.unwrap_or("")))
                (content)
                footer.site-footer {
                    "© " (site.config.site.title)
                }
            }
        }
    }
}

/// Renders the site header with brand link and navigation
fn site_header(site: &Site, current: &str) -> Markup {
    html! {
        header.site-header {
            a.brand href="/" { (site.config.site.title) }
            nav.site-nav {
                (render_nav(current))
            }
        }
    }
}

/// Renders the top-level navigation, marking the current section
pub fn render_nav(current: &str) -> Markup {
    html! {
        ul {
            @for (title, href, key) in SECTIONS {
                li class=[(*key == current).then_some("current")] {
                    a href=(href) { (title) }
                }
            }
        }
    }
}

/// `<picture>` with a WebP source and the original as fallback.
fn render_picture(site: &Site, image: &ImageAsset, class: &str) -> Markup {
    let src = site.images.url(&image.asset);
    let webp = site.images.webp_url(&image.asset);
    let alt = image.alt.as_deref().unwrap_or("");
    html! {
        @if let Some(src) = src {
            picture class=(class) {
                @if let Some(webp) = webp {
                    source srcset=(webp) type="image/webp";
                }
                img.responsive__img src=(src) alt=(alt) loading="lazy";
            }
        }
    }
}

fn render_tags(tags: &[String]) -> Markup {
    html! {
        @if !tags.is_empty() {
            ul.tags {
                @for tag in tags {
                    li { (tag) }
                }
            }
        }
    }
}

fn render_post_card(post: &BlogPost) -> Markup {
    html! {
        li.post-card {
            h3 { a href=(post.url()) { (post.title) } }
            p.post-meta {
                time datetime=(post.pub_date.format("%Y-%m-%d").to_string()) { (long_date(&post.pub_date)) }
            }
            p { (post.excerpt) }
            (render_tags(&post.tags))
        }
    }
}

/// Technologies grouped by category, in first-seen order.
fn group_technologies(technologies: &[Technology]) -> Vec<(&str, Vec<&Technology>)> {
    let mut groups: Vec<(&str, Vec<&Technology>)> = Vec::new();
    for tech in technologies {
        let category = tech.category.as_deref().unwrap_or("Other");
        match groups.iter_mut().find(|(name, _)| *name == category) {
            Some((_, members)) => members.push(tech),
            None => groups.push((category, vec![tech])),
        }
    }
    groups
}

fn render_project(site: &Site, project: &Project) -> Markup {
    html! {
        article.project id=[(!project.slug.is_empty()).then_some(project.slug.as_str())] {
            @if let Some(image) = &project.image {
                (render_picture(site, image, "project__image"))
            }
            h2 { (project.title) }
            p { (project.excerpt) }
            (render_tags(&project.tags))
            (site.rich_text.render(&project.body))
            p.project__links {
                @if let Some(url) = project.url.as_deref().filter(|u| !u.is_empty()) {
                    (render_link(url, html! { "Visit" }))
                    " "
                }
                @if let Some(repo) = project.repository.as_deref().filter(|u| !u.is_empty()) {
                    (render_link(repo, html! { "Source" }))
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page
fn render_index(site: &Site) -> Markup {
    let content = site.content;
    let recent = site.blog.recent();

    let body = html! {
        main.index-page {
            section.hero {
                @if let Some(photo) = content.biography.as_ref().and_then(|b| b.photo.as_ref()) {
                    (render_picture(site, photo, "hero__photo"))
                }
                div.hero__text {
                    h1 { (site.config.site.title) }
                    @if let Some(bio) = &content.biography {
                        p.hero__bio { (bio.short_bio) }
                    }
                    @if !content.social_links.is_empty() {
                        ul.social-links {
                            @for link in &content.social_links {
                                li { (render_link(&link.url, html! { (link.label) })) }
                            }
                        }
                    }
                }
            }
            @if !content.services.is_empty() {
                section {
                    h2 { "Services" }
                    ul.services {
                        @for service in &content.services {
                            li.service {
                                @if let Some(icon) = &service.icon {
                                    (render_picture(site, icon, "service__icon"))
                                }
                                h3 { (service.title) }
                                p { (service.excerpt) }
                            }
                        }
                    }
                }
            }
            @if !content.technologies.is_empty() {
                section {
                    h2 { "Technologies" }
                    @for (category, members) in group_technologies(&content.technologies) {
                        h3 { (category) }
                        ul.tech {
                            @for tech in members {
                                li.tech__icon {
                                    @if let Some(icon) = &tech.icon {
                                        (render_picture(site, icon, "tech__logo"))
                                    }
                                    span { (tech.name) }
                                }
                            }
                        }
                    }
                }
            }
            @if !recent.is_empty() {
                section {
                    h2 { "Recent posts" }
                    ul.post-list {
                        @for post in recent {
                            (render_post_card(post))
                        }
                    }
                    p { a href="/blog/" { "All posts" } }
                }
            }
        }
        (site.animations(&[
            Animation::slide_inline(".hero__photo", -200.0).rotated(-8.0),
            Animation::slide_inline(".hero__text", 200.0),
            Animation::slide_in_block(".service", 100.0),
            Animation::slide_in_block(".post-card", 100.0),
            Animation::scale_on_hover(".tech__icon"),
        ]))
    };

    base_document(site, "", "/", Some("home"), body)
}

/// Renders the about page from the full biography
fn render_about_page(site: &Site) -> Markup {
    let bio = site.content.biography.as_ref();
    let resume = bio
        .and_then(|b| b.resume.as_ref())
        .and_then(|r| site.images.file_url(&r.asset));

    let body = html! {
        main.about-page {
            h1 { "About" }
            @if let Some(bio) = bio {
                article.about-content {
                    (site.rich_text.render(&bio.full_bio))
                }
            }
            @if let Some(resume) = resume {
                p.resume {
                    a href=(resume) download { "Download resume" }
                }
            }
        }
        (site.animations(&[Animation::slide_in_block(".about-content", 60.0)]))
    };

    base_document(site, "About", "/about/", Some("about"), body)
}

fn render_projects_page(site: &Site) -> Markup {
    let body = html! {
        main.projects-page {
            h1 { "Projects" }
            div.projects {
                @for project in &site.content.projects {
                    (render_project(site, project))
                }
            }
        }
        (site.animations(&[
            Animation::slide_in_block(".project", 100.0),
            Animation::scale_on_hover(".project__image"),
        ]))
    };

    base_document(site, "Projects", "/projects/", Some("projects"), body)
}

fn render_blog_index(site: &Site) -> Markup {
    let latest = site.blog.latest();
    let body = html! {
        main.blog-page {
            h1 { "Blog" }
            @if latest.is_empty() {
                p { "No posts yet." }
            } @else {
                ul.post-list {
                    @for post in latest {
                        (render_post_card(post))
                    }
                }
            }
        }
        (site.animations(&[Animation::slide_in_block(".post-card", 100.0)]))
    };

    base_document(site, "Blog", "/blog/", Some("blog"), body)
}

/// Renders a single blog post; the markdown body is trusted author content
fn render_post_page(site: &Site, post: &BlogPost) -> Markup {
    let body = html! {
        main.post-page {
            article {
                header {
                    h1 { (post.title) }
                    p.post-meta {
                        "Published on "
                        time datetime=(post.pub_date.format("%Y-%m-%d").to_string()) { (long_date(&post.pub_date)) }
                        @if let Some(updated) = &post.updated_date {
                            " · Updated on "
                            time datetime=(updated.format("%Y-%m-%d").to_string()) { (long_date(updated)) }
                        }
                    }
                    (render_tags(&post.tags))
                    @if let Some(image) = &post.image {
                        img.responsive__img src=(image) alt=(post.title);
                    }
                }
                div.post-body {
                    (PreEscaped(post.body_html()))
                }
            }
        }
    };

    base_document(site, &post.title, &post.url(), Some("blog"), body)
}

fn render_contact_page(site: &Site) -> Markup {
    let body = html! {
        main.contact-page {
            h1 { "Contact" }
            form.contact-form action=(CONTACT_ROUTE) method="post" {
                label {
                    "Name"
                    input type="text" name="name" required;
                }
                label {
                    "Email"
                    input type="email" name="email" required;
                }
                label {
                    "Message"
                    textarea name="message" rows="6" required {}
                }
                // Honeypot: hidden from people, filled in by naive bots.
                div.honeypot aria-hidden="true" {
                    input type="text" name="masterLenina" tabindex="-1" autocomplete="off";
                }
                button type="submit" { "Send" }
                p.contact-status role="status" {}
            }
        }
        script type="module" { (PreEscaped(CONTACT_JS)) }
        (site.animations(&[Animation::slide_in_block(".contact-form", 80.0)]))
    };

    base_document(site, "Contact", "/contact/", Some("contact"), body)
}

// ============================================================================
// Tests
// ============================================================================
