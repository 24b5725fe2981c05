use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::id::{ArticleId, RawLegacyId, RawPrimaryId};
use crate::{Error, Result};

/// Placeholder shown wherever an article has no summary.
pub const SUMMARY_PLACEHOLDER: &str = "No summary available.";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "WireArticle")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub url: String,
    pub source: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub img_url: Option<String>,
    pub metadata: HashMap<String, Value>,
}

impl Article {
    /// The external source link carried in `metadata.base_url`, when present.
    pub fn base_url(&self) -> Option<&str> {
        self.metadata.get("base_url").and_then(Value::as_str)
    }

    pub fn summary_text(&self) -> &str {
        self.summary.as_deref().unwrap_or(SUMMARY_PLACEHOLDER)
    }

    pub fn source_label(&self) -> &str {
        self.source.as_deref().unwrap_or("")
    }
}

/// Raw record as the backend serializes it. Identifier shapes and the
/// loosely-typed timestamp are normalized in the `From` conversion so the
/// rest of the codebase only ever sees the canonical `Article`.
#[derive(Debug, Deserialize)]
struct WireArticle {
    #[serde(rename = "_id", default)]
    primary_id: Option<RawPrimaryId>,
    #[serde(default)]
    id: Option<RawLegacyId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    img_url: Option<String>,
    #[serde(default)]
    metadata: HashMap<String, Value>,
}

impl From<WireArticle> for Article {
    fn from(wire: WireArticle) -> Self {
        Article {
            id: ArticleId::from_wire(wire.primary_id, wire.id),
            title: wire.title,
            content: wire.content,
            summary: wire.summary.filter(|s| !s.is_empty()),
            url: wire.url,
            source: wire.source.filter(|s| !s.is_empty()),
            published_at: wire.published_at.as_deref().and_then(parse_timestamp),
            img_url: wire.img_url.filter(|s| !s.is_empty()),
            metadata: wire.metadata,
        }
    }
}

/// Lenient timestamp parsing: RFC 3339 first, then a bare date. Anything
/// else is treated as absent, which sorts as the earliest instant.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}

/// Form payload for creating or updating an article. The identifier and
/// the write-time `metadata.base_url` are never part of the draft; the
/// gateway derives them when it builds the request body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub url: String,
    pub source: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub img_url: Option<String>,
}

impl ArticleDraft {
    /// Client-side validation: the three required fields must be non-empty
    /// and the URL must parse so an origin can be derived from it.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("title", &self.title),
            ("content", &self.content),
            ("url", &self.url),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation(format!("{} is required", field)));
            }
        }
        self.origin().map(|_| ())
    }

    /// Origin portion of the submitted URL, persisted as
    /// `metadata.base_url` at write time.
    pub fn origin(&self) -> Result<String> {
        let parsed =
            Url::parse(&self.url).map_err(|_| Error::InvalidUrl(self.url.clone()))?;
        let origin = parsed.origin();
        if !origin.is_tuple() {
            return Err(Error::InvalidUrl(self.url.clone()));
        }
        Ok(origin.ascii_serialization())
    }
}

impl From<&Article> for ArticleDraft {
    fn from(article: &Article) -> Self {
        ArticleDraft {
            title: article.title.clone(),
            content: article.content.clone(),
            summary: article.summary.clone(),
            url: article.url.clone(),
            source: article.source.clone(),
            published_at: article.published_at,
            img_url: article.img_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_plain_string_id() {
        let article: Article = serde_json::from_value(serde_json::json!({
            "_id": "65fe0",
            "title": "Hello",
            "content": "Body",
            "url": "https://example.org/a"
        }))
        .unwrap();
        assert_eq!(article.id, ArticleId::Plain("65fe0".into()));
        assert_eq!(article.title, "Hello");
    }

    #[test]
    fn deserializes_wrapped_oid() {
        let article: Article = serde_json::from_value(serde_json::json!({
            "_id": { "$oid": "65fe1" },
            "id": 7,
            "title": "Hello"
        }))
        .unwrap();
        assert_eq!(article.id, ArticleId::Wrapped("65fe1".into()));
    }

    #[test]
    fn falls_back_to_legacy_numeric_id() {
        let article: Article =
            serde_json::from_value(serde_json::json!({ "id": 7, "title": "Hello" })).unwrap();
        assert_eq!(article.id, ArticleId::Legacy("7".into()));
    }

    #[test]
    fn no_identifier_is_missing_not_an_error() {
        let article: Article =
            serde_json::from_value(serde_json::json!({ "title": "Hello" })).unwrap();
        assert!(article.id.is_missing());
    }

    #[test]
    fn bad_timestamp_sorts_as_absent() {
        let article: Article = serde_json::from_value(serde_json::json!({
            "_id": "a",
            "published_at": "not a date"
        }))
        .unwrap();
        assert_eq!(article.published_at, None);
    }

    #[test]
    fn bare_date_parses_at_midnight_utc() {
        let article: Article = serde_json::from_value(serde_json::json!({
            "_id": "a",
            "published_at": "2024-06-01"
        }))
        .unwrap();
        assert_eq!(
            article.published_at.unwrap().to_rfc3339(),
            "2024-06-01T00:00:00+00:00"
        );
    }

    #[test]
    fn base_url_read_from_metadata() {
        let article: Article = serde_json::from_value(serde_json::json!({
            "_id": "a",
            "metadata": { "base_url": "https://example.org", "extra": 1 }
        }))
        .unwrap();
        assert_eq!(article.base_url(), Some("https://example.org"));
    }

    #[test]
    fn draft_requires_title_content_url() {
        let mut draft = ArticleDraft {
            title: "T".into(),
            content: "C".into(),
            url: "https://example.org/a/b".into(),
            ..Default::default()
        };
        assert!(draft.validate().is_ok());
        draft.content = "  ".into();
        assert!(matches!(draft.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn draft_origin_strips_path() {
        let draft = ArticleDraft {
            title: "T".into(),
            content: "C".into(),
            url: "https://example.org/a/b?x=1".into(),
            ..Default::default()
        };
        assert_eq!(draft.origin().unwrap(), "https://example.org");
    }

    #[test]
    fn draft_rejects_unparseable_url() {
        let draft = ArticleDraft {
            title: "T".into(),
            content: "C".into(),
            url: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(draft.validate(), Err(Error::InvalidUrl(_))));
    }
}
