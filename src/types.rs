//! Content records shared by the content client and the page generator.
//!
//! These mirror what the content store returns for each fixed query. The
//! store is schema-less from our side, so every field defaults: a missing
//! value becomes an empty string, an empty list, or `None`, never an error.

use crate::rich_text::RichText;
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing field.
///
/// Projections return `null` for absent attributes, which serde would
/// otherwise reject for `String` and `Vec` fields.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A pointer to an uploaded asset: either a reference id or, when the query
/// dereferenced it (`asset->{url}`), the final URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetRef {
    #[serde(rename = "_ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageAsset {
    #[serde(deserialize_with = "nullable")]
    pub asset: AssetRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAsset {
    #[serde(deserialize_with = "nullable")]
    pub asset: AssetRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Biography {
    #[serde(deserialize_with = "nullable")]
    pub short_bio: String,
    /// Long-form biography for the about page.
    #[serde(deserialize_with = "nullable")]
    pub full_bio: RichText,
    pub photo: Option<ImageAsset>,
    pub resume: Option<FileAsset>,
}

/// A social profile link. Documents in the store name these fields
/// inconsistently, so the first present of `label`/`name`/`title` and of
/// `url`/`link`/`href` wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSocialLink")]
pub struct SocialLink {
    pub label: String,
    pub url: String,
    pub icon: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawSocialLink {
    label: Option<String>,
    name: Option<String>,
    title: Option<String>,
    url: Option<String>,
    link: Option<String>,
    href: Option<String>,
    icon: Option<String>,
}

impl From<RawSocialLink> for SocialLink {
    fn from(raw: RawSocialLink) -> Self {
        Self {
            label: raw.label.or(raw.name).or(raw.title).unwrap_or_default(),
            url: raw.url.or(raw.link).or(raw.href).unwrap_or_default(),
            icon: raw.icon,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub excerpt: String,
    pub icon: Option<ImageAsset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Technology {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Category name, dereferenced by the query.
    pub category: Option<String>,
    pub icon: Option<ImageAsset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub slug: String,
    #[serde(deserialize_with = "nullable")]
    pub excerpt: String,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
    /// Live site, if any.
    pub url: Option<String>,
    pub repository: Option<String>,
    pub image: Option<ImageAsset>,
    #[serde(deserialize_with = "nullable")]
    pub body: RichText,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn biography_tolerates_missing_fields() {
        let bio: Biography = serde_json::from_value(json!({ "short_bio": "Hi" })).unwrap();
        assert_eq!(bio.short_bio, "Hi");
        assert!(bio.full_bio.is_empty());
        assert!(bio.photo.is_none());
    }

    #[test]
    fn biography_reads_dereferenced_assets() {
        let bio: Biography = serde_json::from_value(json!({
            "short_bio": "Hi",
            "photo": { "asset": { "url": "https://cdn/p.jpg" } },
            "resume": { "asset": { "url": "https://cdn/cv.pdf" } }
        }))
        .unwrap();
        assert_eq!(
            bio.photo.unwrap().asset.url.as_deref(),
            Some("https://cdn/p.jpg")
        );
        assert_eq!(
            bio.resume.unwrap().asset.url.as_deref(),
            Some("https://cdn/cv.pdf")
        );
    }

    #[test]
    fn explicit_nulls_become_defaults() {
        let p: Project = serde_json::from_value(json!({
            "title": "Folio",
            "excerpt": null,
            "tags": null,
            "body": null,
            "image": null
        }))
        .unwrap();
        assert_eq!(p.excerpt, "");
        assert!(p.tags.is_empty());
        assert!(p.body.is_empty());
        assert!(p.image.is_none());
    }

    #[test]
    fn social_link_accepts_store_field_names() {
        let link: SocialLink = serde_json::from_value(json!({
            "_id": "abc",
            "_type": "socialInfoItem",
            "name": "GitHub",
            "link": "https://github.com/someone"
        }))
        .unwrap();
        assert_eq!(link.label, "GitHub");
        assert_eq!(link.url, "https://github.com/someone");
    }

    #[test]
    fn social_link_with_overlapping_field_names() {
        let link: SocialLink = serde_json::from_value(json!({
            "name": "github",
            "title": "GitHub",
            "url": "https://github.com/someone",
            "link": "https://github.com/other",
            "href": null
        }))
        .unwrap();
        assert_eq!(link.label, "github");
        assert_eq!(link.url, "https://github.com/someone");

        let link: SocialLink = serde_json::from_value(json!({
            "label": "Mastodon",
            "name": null,
            "href": "https://example.social/@me"
        }))
        .unwrap();
        assert_eq!(link.label, "Mastodon");
        assert_eq!(link.url, "https://example.social/@me");
    }

    #[test]
    fn project_ignores_unknown_keys() {
        let p: Project = serde_json::from_value(json!({
            "title": "Folio",
            "_createdAt": "2023-01-01",
            "tags": ["rust"]
        }))
        .unwrap();
        assert_eq!(p.title, "Folio");
        assert_eq!(p.tags, vec!["rust"]);
    }
}
