//! CDN URLs for content-store assets.
//!
//! Queries either dereference an asset (`photo{asset->{url}}`), in which case
//! the record already carries a URL, or return a bare reference id:
//!
//! ```text
//! image-<id>-<width>x<height>-<ext>  →  https://cdn.sanity.io/images/<project>/<dataset>/<id>-<width>x<height>.<ext>
//! file-<id>-<ext>                    →  https://cdn.sanity.io/files/<project>/<dataset>/<id>.<ext>
//! ```
//!
//! Format conversion is a query parameter on the image CDN (`fm=webp`).

use crate::types::AssetRef;

const CDN_BASE: &str = "https://cdn.sanity.io";

#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    /// URL of the image in its original format.
    pub fn url(&self, asset: &AssetRef) -> Option<String> {
        if let Some(url) = asset.url.as_deref().filter(|u| !u.is_empty()) {
            return Some(url.to_string());
        }
        let reference = asset.reference.as_deref()?;
        let rest = reference.strip_prefix("image-")?;
        // <id>-<WxH>-<ext>; the id itself never contains dashes.
        let (stem, ext) = rest.rsplit_once('-')?;
        Some(format!(
            "{CDN_BASE}/images/{}/{}/{stem}.{ext}",
            self.project_id, self.dataset
        ))
    }

    /// URL of the same image re-encoded as WebP by the CDN.
    pub fn webp_url(&self, asset: &AssetRef) -> Option<String> {
        self.url(asset).map(|url| with_param(&url, "fm=webp"))
    }

    /// URL of a non-image file asset (e.g. the resume PDF).
    pub fn file_url(&self, asset: &AssetRef) -> Option<String> {
        if let Some(url) = asset.url.as_deref().filter(|u| !u.is_empty()) {
            return Some(url.to_string());
        }
        let reference = asset.reference.as_deref()?;
        let rest = reference.strip_prefix("file-")?;
        let (id, ext) = rest.rsplit_once('-')?;
        Some(format!(
            "{CDN_BASE}/files/{}/{}/{id}.{ext}",
            self.project_id, self.dataset
        ))
    }
}

fn with_param(url: &str, param: &str) -> String {
    if url.contains('?') {
        format!("{url}&{param}")
    } else {
        format!("{url}?{param}")
    }
}
