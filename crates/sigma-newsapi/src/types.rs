//! NewsAPI response types.
//!
//! Both `/v2/top-headlines` and `/v2/everything` answer with the same
//! `{"status": "ok", "articles": [...]}` envelope, or
//! `{"status": "error", "code": ..., "message": ...}` on failure.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sigma_core::SourceArticle;

/// Error codes NewsAPI uses when a key is out of quota.
pub const RATE_LIMIT_CODES: &[&str] = &["rateLimited", "apiKeyExhausted"];

#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    pub status: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub articles: Vec<ApiArticle>,
}

#[derive(Debug, Deserialize)]
pub struct ApiSource {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiArticle {
    #[serde(default)]
    pub source: Option<ApiSource>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ApiArticle {
    /// Converts into the pipeline's source record. Articles without a URL are
    /// unusable (nothing to scrape, nothing to link) and yield `None`.
    #[must_use]
    pub fn into_source_article(self) -> Option<SourceArticle> {
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        let published_at = self
            .published_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Some(SourceArticle {
            title: self.title.unwrap_or_default(),
            url,
            source_name: self.source.and_then(|s| s.name).unwrap_or_default(),
            image_url: self.url_to_image.filter(|u| !u.trim().is_empty()),
            description: self.description.unwrap_or_default(),
            snippet: self.content.unwrap_or_default(),
            published_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_full_article() {
        let raw = serde_json::json!({
            "source": { "id": "bbc-news", "name": "BBC News" },
            "author": "Staff",
            "title": "Starship reaches orbit",
            "description": "SpaceX flew its rocket.",
            "url": "https://bbc.example/starship",
            "urlToImage": "https://bbc.example/starship.jpg",
            "publishedAt": "2025-03-14T10:30:00Z",
            "content": "SpaceX flew its rocket from Texas… [+1200 chars]"
        });
        let article: ApiArticle = serde_json::from_value(raw).unwrap();
        let converted = article.into_source_article().unwrap();
        assert_eq!(converted.source_name, "BBC News");
        assert_eq!(converted.title, "Starship reaches orbit");
        assert_eq!(
            converted.image_url.as_deref(),
            Some("https://bbc.example/starship.jpg")
        );
        assert!(converted.snippet.starts_with("SpaceX flew"));
        assert_eq!(
            converted.published_at.unwrap().to_rfc3339(),
            "2025-03-14T10:30:00+00:00"
        );
    }

    #[test]
    fn nulls_become_empty_strings() {
        let raw = serde_json::json!({
            "source": { "id": null, "name": null },
            "title": "Only a title",
            "description": null,
            "url": "https://example.com/a",
            "urlToImage": null,
            "publishedAt": null,
            "content": null
        });
        let article: ApiArticle = serde_json::from_value(raw).unwrap();
        let converted = article.into_source_article().unwrap();
        assert_eq!(converted.description, "");
        assert_eq!(converted.snippet, "");
        assert_eq!(converted.source_name, "");
        assert!(converted.image_url.is_none());
        assert!(converted.published_at.is_none());
    }

    #[test]
    fn article_without_url_is_dropped() {
        let raw = serde_json::json!({ "title": "No link" });
        let article: ApiArticle = serde_json::from_value(raw).unwrap();
        assert!(article.into_source_article().is_none());
    }
}
