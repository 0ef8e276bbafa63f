//! # Folio
//!
//! A personal portfolio and blog. Page sections (biography, projects,
//! services, technologies, social links) live in a hosted content store;
//! blog posts are local markdown files; a small HTTP server hosts the built
//! site and relays the contact form to the owner's mailbox.
//!
//! # Architecture
//!
//! ```text
//! 1. Fetch     content store  →  SiteContent      (GROQ queries over HTTP)
//! 2. Load      content/blog/  →  BlogCollection   (front matter + markdown)
//! 3. Generate  both           →  dist/            (final HTML site)
//! 4. Serve     dist/ + POST /api/contact.json     (static files + mail relay)
//! ```
//!
//! Fetching and loading are independent; generation is a pure function of
//! their results plus config, so page tests never touch the network.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Read-only content-store client; one fixed query per page section |
//! | [`types`] | Records returned by the content store (`Biography`, `Project`, …) |
//! | [`image_url`] | CDN URLs for image and file asset references |
//! | [`rich_text`] | Portable Text blocks → HTML, with the link rule for external hrefs |
//! | [`blog`] | Markdown post loading, schema validation, latest/recent selection |
//! | [`text`] | Date parsing and formatting, slugs, top-N ordering |
//! | [`animation`] | Scroll and hover animation declarations → GSAP module script |
//! | [`contact`] | Honeypot screening, email composition, SMTP delivery |
//! | [`server`] | axum router: contact endpoint plus static file serving |
//! | [`generate`] | Renders every page with Maud |
//! | [`config`] | `config.toml` loading, validation, merging, env overrides, CSS colors |
//! | [`output`] | CLI output formatting for `build` and `check` |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Templates are
//! Rust expressions checked at compile time, and all interpolation is
//! auto-escaped. The same escaping covers the contact notification email, so
//! visitor input never reaches the owner's mail client as markup.
//!
//! ## Explicit Clients
//!
//! The content-store client and the mail transport are values built from
//! config and passed where they are needed. Tests swap in an `httpmock`
//! server or a stub [`contact::Mailer`].
//!
//! ## Secrets in the Environment
//!
//! `config.toml` holds everything that is safe to commit. Content-store
//! tokens and SMTP credentials come from `FOLIO_*` environment variables
//! layered on top (see [`config::SiteConfig::apply_env`]).

pub mod animation;
pub mod blog;
pub mod config;
pub mod contact;
pub mod content;
pub mod generate;
pub mod image_url;
pub mod logging;
pub mod output;
pub mod rich_text;
pub mod server;
pub mod text;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
