//! Upstream ideas payload.
//!
//! Deserialization is lenient: missing arrays default to empty and unknown
//! fields are ignored, so a partial upstream answer still renders.

use serde::{Deserialize, Serialize};

/// Thumbnail shown when an idea has no small image.
pub const NO_IMAGE_PLACEHOLDER: &str = "https://placehold.co/400x300/e2e8f0/cbd5e0?text=No+Image";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IdeasResponse {
    pub data: Vec<IdeaPost>,
    pub links: Links,
    pub meta: Meta,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IdeaPost {
    pub id: u64,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub published_at: String,
    pub deleted_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub small_image: Vec<IdeaImage>,
    pub medium_image: Vec<IdeaImage>,
}

impl IdeaPost {
    /// First small image, or the "No Image" placeholder.
    pub fn thumbnail_url(&self) -> &str {
        self.small_image
            .first()
            .map(|image| image.url.as_str())
            .unwrap_or(NO_IMAGE_PLACEHOLDER)
    }

    /// `YYYY-MM-DD` part of the publish timestamp.
    pub fn published_date(&self) -> &str {
        self.published_at.get(..10).unwrap_or(&self.published_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IdeaImage {
    pub id: u64,
    pub mime: String,
    pub file_name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Links {
    pub first: String,
    pub last: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Meta {
    pub current_page: u32,
    pub from: Option<u32>,
    pub last_page: u32,
    pub links: Vec<Link>,
    pub path: String,
    pub per_page: u32,
    pub to: Option<u32>,
    pub total: u32,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            current_page: 1,
            from: None,
            last_page: 1,
            links: Vec::new(),
            path: String::new(),
            per_page: 10,
            to: None,
            total: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Link {
    pub url: Option<String>,
    pub label: String,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "data": [{
            "id": 12,
            "slug": "tips-kerja",
            "title": "Tips Kerja",
            "content": "<p>...</p>",
            "published_at": "2024-05-02 09:00:00",
            "deleted_at": null,
            "created_at": "2024-05-01 09:00:00",
            "updated_at": "2024-05-01 09:00:00",
            "small_image": [{"id": 1, "mime": "image/jpeg", "file_name": "a.jpg", "url": "https://assets.suitdev.com/a.jpg"}],
            "medium_image": []
        }],
        "links": {"first": "f", "last": "l", "prev": null, "next": "n"},
        "meta": {
            "current_page": 1, "from": 1, "last_page": 30,
            "links": [{"url": null, "label": "&laquo; Previous", "active": false}],
            "path": "https://suitmedia-backend.suitdev.com/api/ideas",
            "per_page": 10, "to": 10, "total": 296
        }
    }"#;

    #[test]
    fn parses_upstream_payload() {
        let response: IdeasResponse = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(response.meta.total, 296);
        assert_eq!(response.meta.last_page, 30);
        assert_eq!(response.links.next.as_deref(), Some("n"));
        let post = &response.data[0];
        assert_eq!(post.thumbnail_url(), "https://assets.suitdev.com/a.jpg");
        assert_eq!(post.published_date(), "2024-05-02");
    }

    #[test]
    fn missing_images_fall_back_to_placeholder() {
        let post: IdeaPost = serde_json::from_str(r#"{"id": 1, "title": "t"}"#).unwrap();
        assert_eq!(post.thumbnail_url(), NO_IMAGE_PLACEHOLDER);
    }

    #[test]
    fn empty_object_is_an_empty_page() {
        let response: IdeasResponse = serde_json::from_str("{}").unwrap();
        assert!(response.data.is_empty());
        assert_eq!(response.meta.last_page, 1);
    }
}
