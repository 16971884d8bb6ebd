use serde::{Deserialize, Serialize};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const PLACEHOLDER_THUMBNAIL: &str = "https://via.placeholder.com/128x192";

/// One page of results from the volumes endpoint. `items` is absent
/// entirely when the query matches nothing.
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeList {
    #[serde(default)]
    pub items: Option<Vec<Volume>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub volume_info: Option<VolumeInfo>,
    #[serde(default)]
    pub access_info: Option<AccessInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
    pub small_thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessInfo {
    pub pdf: Option<PdfAccess>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfAccess {
    pub download_link: Option<String>,
}

/// Canonical record used for both display and persistence. Built once
/// from a search result and stored as a full copy, so later searches
/// never affect shelved entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub thumbnail_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl BookRecord {
    /// Normalizes a raw volume. Missing optional fields fall back to
    /// placeholders and never fail; a blank title counts as missing.
    pub fn from_volume(volume: Volume) -> Self {
        let info = volume.volume_info.unwrap_or_default();

        let title = info
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_owned());

        let authors = info
            .authors
            .unwrap_or_else(|| vec![UNKNOWN_AUTHOR.to_owned()]);

        let thumbnail_url = info
            .image_links
            .and_then(|links| links.thumbnail.or(links.small_thumbnail))
            .unwrap_or_else(|| PLACEHOLDER_THUMBNAIL.to_owned());

        let download_url = volume
            .access_info
            .and_then(|access| access.pdf)
            .and_then(|pdf| pdf.download_link);

        Self {
            id: volume.id,
            title,
            authors,
            thumbnail_url,
            download_url,
        }
    }

    pub fn authors_line(&self) -> String {
        self.authors.join(", ")
    }
}
