//! Read-only client for the hosted content store.
//!
//! Every page section that is not a blog post (biography, social links,
//! services, technologies, projects) lives in a hosted document store and is
//! fetched with one fixed GROQ query per section. The client is an explicitly
//! constructed value: configuration goes in through [`ContentClient::new`],
//! there is no process-wide handle.
//!
//! ## Wire format
//!
//! ```text
//! GET {host}/v{api_version}/data/query/{dataset}?query=<GROQ>
//!   host = https://{project}.apicdn.sanity.io   (use_cdn = true)
//!        | https://{project}.api.sanity.io      (use_cdn = false)
//!        | content_store.api_host               (override)
//!
//! 200 { "ms": 4, "query": "...", "result": <value> }
//! ```
//!
//! Only `result` is kept. A non-2xx response is an error that carries the
//! status and body. There is no caching, retry, or pagination: a failed
//! query fails the build that asked for it.

use crate::config::ContentStoreConfig;
use crate::types::{Biography, Project, Service, SocialLink, Technology};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Content store returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

pub const BIOGRAPHY_QUERY: &str = r#"*[_type == 'biography']{
    short_bio,
    full_bio,
    photo{alt, asset->{url}},
    resume{asset->{url}},
}[0]"#;

pub const SOCIAL_LINKS_QUERY: &str = r#"*[_type == 'socialInfoItem']{
    "label": coalesce(label, name, title),
    "url": coalesce(url, link, href),
    icon,
}"#;

pub const SERVICES_QUERY: &str = r#"*[_type == 'service'] | order(orderRank asc){
    title,
    excerpt,
    icon{alt, asset->{url}},
}"#;

pub const TECHNOLOGIES_QUERY: &str = r#"*[_type == 'technology'] | order(name asc){
    name,
    "category": category->name,
    icon{alt, asset->{url}},
}"#;

pub const PROJECTS_QUERY: &str = r#"*[_type == 'project'] | order(_createdAt desc){
    title,
    "slug": slug.current,
    excerpt,
    tags,
    url,
    repository,
    image{alt, asset->{url}},
    body,
}"#;

/// Everything the generator needs from the content store.
#[derive(Debug, Clone, Default)]
pub struct SiteContent {
    pub biography: Option<Biography>,
    pub social_links: Vec<SocialLink>,
    pub services: Vec<Service>,
    pub technologies: Vec<Technology>,
    pub projects: Vec<Project>,
}

#[derive(Deserialize)]
struct QueryResponse<T> {
    result: T,
}

#[derive(Debug, Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl ContentClient {
    /// Build a client with a default HTTP stack.
    pub fn new(config: &ContentStoreConfig) -> Self {
        Self::with_http(config, reqwest::Client::new())
    }

    /// Build a client on top of a caller-provided `reqwest::Client`.
    pub fn with_http(config: &ContentStoreConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint: query_endpoint(config),
            token: config.token.clone(),
        }
    }

    /// Run one GROQ query and decode its `result`.
    pub async fn query<T: DeserializeOwned>(&self, groq: &str) -> Result<T, ContentError> {
        tracing::debug!(endpoint = %self.endpoint, "content query");

        let mut request = self.http.get(&self.endpoint).query(&[("query", groq)]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "content query failed");
            return Err(ContentError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        let envelope: QueryResponse<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.result)
    }

    pub async fn biography(&self) -> Result<Option<Biography>, ContentError> {
        self.query(BIOGRAPHY_QUERY).await
    }

    pub async fn social_links(&self) -> Result<Vec<SocialLink>, ContentError> {
        self.query(SOCIAL_LINKS_QUERY).await
    }

    pub async fn services(&self) -> Result<Vec<Service>, ContentError> {
        self.query(SERVICES_QUERY).await
    }

    pub async fn technologies(&self) -> Result<Vec<Technology>, ContentError> {
        self.query(TECHNOLOGIES_QUERY).await
    }

    pub async fn projects(&self) -> Result<Vec<Project>, ContentError> {
        self.query(PROJECTS_QUERY).await
    }

    /// Fetch every section concurrently. The first failure fails the whole fetch.
    pub async fn fetch_all(&self) -> Result<SiteContent, ContentError> {
        let (biography, social_links, services, technologies, projects) = tokio::try_join!(
            self.biography(),
            self.social_links(),
            self.services(),
            self.technologies(),
            self.projects(),
        )?;
        tracing::info!(
            projects = projects.len(),
            technologies = technologies.len(),
            services = services.len(),
            "fetched site content"
        );
        Ok(SiteContent {
            biography,
            social_links,
            services,
            technologies,
            projects,
        })
    }
}

/// `{host}/v{version}/data/query/{dataset}` for the given store settings.
pub fn query_endpoint(config: &ContentStoreConfig) -> String {
    let host = match &config.api_host {
        Some(host) => host.trim_end_matches('/').to_string(),
        None => {
            let api = if config.use_cdn { "apicdn" } else { "api" };
            format!("https://{}.{api}.sanity.io", config.project_id)
        }
    };
    let version = config.api_version.trim_start_matches('v');
    format!("{host}/v{version}/data/query/{}", config.dataset)
}
