//! Site configuration module.
//!
//! Handles loading, validating, and layering `config.toml`. Stock defaults are
//! overridden by the user's `config.toml` in the source directory, and secrets
//! (content-store token, SMTP credentials) are layered on top from the
//! environment so they never have to live in the repository.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Portfolio"
//! description = "Projects, writing and contact"
//! base_url = "http://localhost:3000"
//!
//! [content_store]
//! project_id = "4778um7r"
//! dataset = "production"
//! api_version = "2023-05-01"
//! use_cdn = true
//! # api_host = "https://proxy.example"  # Override the query host
//!
//! [blog]
//! dir = "blog"              # Relative to the source directory
//!
//! [contact]
//! recipient = "Site Owner <owner@example.com>"
//! from_name = "Portfolio"
//! subject = "New contact!"
//!
//! [smtp]
//! host = ""
//! port = 465
//! user = ""
//! password = ""
//! tls = "implicit"          # implicit | starttls | none
//!
//! [server]
//! bind = "127.0.0.1:3000"
//!
//! [animations]
//! enabled = true
//! gsap_base = "https://cdn.jsdelivr.net/npm/gsap@3.12.5"
//!
//! [colors]
//! primary = "#009FB7"
//! ...
//! ```
//!
//! ## Environment
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `FOLIO_SANITY_PROJECT_ID` | `content_store.project_id` |
//! | `FOLIO_SANITY_DATASET` | `content_store.dataset` |
//! | `FOLIO_SANITY_API_VERSION` | `content_store.api_version` |
//! | `FOLIO_SANITY_TOKEN` | `content_store.token` |
//! | `FOLIO_SMTP_HOST` | `smtp.host` |
//! | `FOLIO_SMTP_PORT` | `smtp.port` |
//! | `FOLIO_SMTP_USER` | `smtp.user` |
//! | `FOLIO_SMTP_PASS` | `smtp.password` |
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site: SiteMeta,
    pub content_store: ContentStoreConfig,
    pub blog: BlogConfig,
    pub contact: ContactConfig,
    pub smtp: SmtpConfig,
    pub server: ServerConfig,
    pub animations: AnimationConfig,
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let store = &self.content_store;
        if store.project_id.is_empty() {
            return Err(ConfigError::Validation(
                "content_store.project_id must not be empty".into(),
            ));
        }
        if !store
            .project_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ConfigError::Validation(
                "content_store.project_id may only contain a-z, 0-9 and dashes".into(),
            ));
        }
        if store.dataset.is_empty() {
            return Err(ConfigError::Validation(
                "content_store.dataset must not be empty".into(),
            ));
        }
        if store.api_version.trim_start_matches('v').is_empty() {
            return Err(ConfigError::Validation(
                "content_store.api_version must not be empty".into(),
            ));
        }
        if self.contact.recipient.trim().is_empty() {
            return Err(ConfigError::Validation(
                "contact.recipient must not be empty".into(),
            ));
        }
        if self.smtp.port == 0 {
            return Err(ConfigError::Validation("smtp.port must be non-zero".into()));
        }
        Ok(())
    }

    /// Layer secrets and deployment settings from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Layer overrides from an arbitrary variable lookup.
    ///
    /// Empty values are ignored so an exported-but-blank variable does not
    /// wipe a value from `config.toml`.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("FOLIO_SANITY_PROJECT_ID") {
            self.content_store.project_id = v;
        }
        if let Some(v) = get("FOLIO_SANITY_DATASET") {
            self.content_store.dataset = v;
        }
        if let Some(v) = get("FOLIO_SANITY_API_VERSION") {
            self.content_store.api_version = v;
        }
        if let Some(v) = get("FOLIO_SANITY_TOKEN") {
            self.content_store.token = Some(v);
        }
        if let Some(v) = get("FOLIO_SMTP_HOST") {
            self.smtp.host = v;
        }
        if let Some(v) = get("FOLIO_SMTP_PORT") {
            self.smtp.port = v.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("FOLIO_SMTP_PORT is not a port number: {v}"))
            })?;
        }
        if let Some(v) = get("FOLIO_SMTP_USER") {
            self.smtp.user = v;
        }
        if let Some(v) = get("FOLIO_SMTP_PASS") {
            self.smtp.password = v;
        }
        Ok(())
    }
}

/// Site-wide metadata used in page heads and navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,
    pub description: String,
    /// Absolute origin of the deployed site, without trailing slash.
    pub base_url: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: "Projects, writing and contact".to_string(),
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Read-only access to the hosted content store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentStoreConfig {
    pub project_id: String,
    pub dataset: String,
    /// Dated API version, e.g. `2023-05-01` (a leading `v` is accepted).
    pub api_version: String,
    /// Query the edge-cached API instead of the live one.
    pub use_cdn: bool,
    /// Override the query host (tests, proxies). Derived from the project id
    /// when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,
    /// Read token for private datasets. Normally supplied via the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ContentStoreConfig {
    fn default() -> Self {
        Self {
            project_id: "4778um7r".to_string(),
            dataset: "production".to_string(),
            api_version: "2023-05-01".to_string(),
            use_cdn: true,
            api_host: None,
            token: None,
        }
    }
}

/// Local blog collection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    /// Directory of markdown posts, relative to the source directory.
    pub dir: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            dir: "blog".to_string(),
        }
    }
}

/// Where contact-form submissions are delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    /// Fixed recipient mailbox, `Name <address>` or a bare address.
    pub recipient: String,
    /// Display name on the sender mailbox (the address is the SMTP user).
    pub from_name: String,
    pub subject: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient: "Site Owner <owner@example.com>".to_string(),
            from_name: "Portfolio".to_string(),
            subject: "New contact!".to_string(),
        }
    }
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    /// TLS from the first byte (usually port 465).
    #[default]
    Implicit,
    /// Plain connection upgraded with STARTTLS (usually port 587).
    Starttls,
    /// No encryption. Only for local relays and tests.
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub tls: SmtpTls,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 465,
            user: String::new(),
            password: String::new(),
            tls: SmtpTls::Implicit,
        }
    }
}

impl SmtpConfig {
    /// Sending needs a host and a user (the user doubles as sender address).
    pub fn validate_for_sending(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "smtp.host is required to relay contact messages (set FOLIO_SMTP_HOST)".into(),
            ));
        }
        if self.user.trim().is_empty() {
            return Err(ConfigError::Validation(
                "smtp.user is required to relay contact messages (set FOLIO_SMTP_USER)".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address for `folio serve`.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Scroll and hover animations emitted into each page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    pub enabled: bool,
    /// Base URL of the GSAP ES module build (`index.js`, `ScrollTrigger.js`).
    pub gsap_base: String,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gsap_base: "https://cdn.jsdelivr.net/npm/gsap@3.12.5".to_string(),
        }
    }
}

/// Theme palette, exposed to the stylesheet as CSS custom properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub primary: String,
    pub primary_light: String,
    pub accent: String,
    pub text: String,
    pub text_strong: String,
    pub text_muted: String,
    pub background: String,
    pub surface: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "#009FB7".to_string(),
            primary_light: "#00c7b8".to_string(),
            accent: "#FED766".to_string(),
            text: "#404040".to_string(),
            text_strong: "#272727".to_string(),
            text_muted: "#a4a4a4".to_string(),
            background: "#FEFDFA".to_string(),
            surface: "#EFF1F3".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults and validates the result.
/// Environment overrides are applied separately by the caller.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
#
# Secrets belong in the environment, not in this file:
#   FOLIO_SANITY_TOKEN, FOLIO_SMTP_HOST, FOLIO_SMTP_PORT,
#   FOLIO_SMTP_USER, FOLIO_SMTP_PASS

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
title = "Portfolio"
description = "Projects, writing and contact"
# Absolute origin of the deployed site, without trailing slash.
base_url = "http://localhost:3000"

# ---------------------------------------------------------------------------
# Content store (read-only)
# ---------------------------------------------------------------------------
[content_store]
project_id = "4778um7r"
dataset = "production"
# Dated API version.
api_version = "2023-05-01"
# Query the edge-cached API instead of the live one.
use_cdn = true
# Override the query host (tests, proxies).
# api_host = "https://4778um7r.apicdn.sanity.io"

# ---------------------------------------------------------------------------
# Blog
# ---------------------------------------------------------------------------
[blog]
# Directory of markdown posts, relative to the source directory.
dir = "blog"

# ---------------------------------------------------------------------------
# Contact relay
# ---------------------------------------------------------------------------
[contact]
# Every accepted submission is mailed to this fixed mailbox.
recipient = "Site Owner <owner@example.com>"
# Display name of the sender; the address is smtp.user.
from_name = "Portfolio"
subject = "New contact!"

[smtp]
host = ""
port = 465
user = ""
password = ""
# implicit (port 465), starttls (port 587) or none (local relays only).
tls = "implicit"

# ---------------------------------------------------------------------------
# Server
# ---------------------------------------------------------------------------
[server]
bind = "127.0.0.1:3000"

# ---------------------------------------------------------------------------
# Animations
# ---------------------------------------------------------------------------
[animations]
enabled = true
# Base URL of the GSAP ES module build.
gsap_base = "https://cdn.jsdelivr.net/npm/gsap@3.12.5"

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
primary = "#009FB7"
primary_light = "#00c7b8"
accent = "#FED766"
text = "#404040"
text_strong = "#272727"
text_muted = "#a4a4a4"
background = "#FEFDFA"
surface = "#EFF1F3"
"##
}

/// Generate CSS custom properties from the color palette.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-primary: {primary};
    --color-primary-light: {primary_light};
    --color-accent: {accent};
    --color-text: {text};
    --color-text-strong: {text_strong};
    --color-text-muted: {text_muted};
    --color-bg: {background};
    --color-surface: {surface};
}}"#,
        primary = colors.primary,
        primary_light = colors.primary_light,
        accent = colors.accent,
        text = colors.text,
        text_strong = colors.text_strong,
        text_muted = colors.text_muted,
        background = colors.background,
        surface = colors.surface,
    )
}
