//! Data models for scraped articles.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleRecord`]: One scraped article, the unit of persistence
//! - [`SiteConfig`]: The site being scraped (origin, category page, article path)
//!
//! Records are stored as self-describing documents, so the serde field names
//! double as the on-disk schema of every store backend.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Title stored when an article page has no `<h1>`.
pub const NO_TITLE: &str = "No Title";

/// Title stored when fetching or parsing an article failed.
pub const ERROR_TITLE: &str = "Error";

/// Image URL stored when the image stage ran but nothing matched.
pub const NO_IMAGE: &str = "No Image";

/// A scraped article.
///
/// `url` is the dedup key. Records are created by one run and never updated
/// afterwards; a later run may only add records with unseen URLs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The absolute article URL.
    pub url: String,
    /// Text of the first `<h1>`, or one of the title sentinels.
    pub title: String,
    /// Space-joined text of every paragraph, or the error text for failed fetches.
    pub content: String,
    /// Publish timestamp from the `article:published_time` meta tag.
    #[serde(default)]
    pub published_date: Option<DateTime<FixedOffset>>,
    /// Cover image URL, [`NO_IMAGE`], or `None` when the image stage did not run
    /// or the fetch failed.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Set only on placeholders built by [`ArticleRecord::failed`]; never stored.
    #[serde(skip)]
    pub fetch_failed: bool,
}

impl ArticleRecord {
    /// Build the placeholder record for an article whose fetch or parse failed.
    ///
    /// The record has no publish date, so it never survives the date filter,
    /// but it is kept in the in-memory batch like any other record.
    pub fn failed(url: &str, error: impl std::fmt::Display) -> Self {
        Self {
            url: url.to_string(),
            title: ERROR_TITLE.to_string(),
            content: error.to_string(),
            published_date: None,
            image_url: None,
            fetch_failed: true,
        }
    }

    /// Whether this record is a fetch or parse failure placeholder.
    pub fn is_error(&self) -> bool {
        self.fetch_failed
    }

    /// Month bucket (`YYYY-MM`) of the publish date, in the date's own offset.
    ///
    /// Derived for reporting only and never persisted.
    pub fn month_year(&self) -> Option<String> {
        self.published_date
            .map(|d| d.format("%Y-%m").to_string())
    }

    /// The cover image URL, if one was actually found.
    pub fn real_image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .filter(|u| *u != NO_IMAGE && !u.is_empty())
    }
}

/// The single site a run scrapes.
///
/// # Fields
///
/// * `origin` - Scheme and host used to absolutize relative links, e.g. `https://hellosehat.com`
/// * `category_url` - The listing page; page `n > 1` is reached with `?page=n`
/// * `article_path` - Path substring that marks an article under the category
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub origin: String,
    pub category_url: String,
    pub article_path: String,
}

impl SiteConfig {
    /// URL of listing page `page` (1-based).
    pub fn page_url(&self, page: usize) -> String {
        if page <= 1 {
            self.category_url.clone()
        } else {
            format!("{}?page={}", self.category_url, page)
        }
    }

    /// Prefix a root-relative href with the site origin.
    pub fn absolutize(&self, href: &str) -> String {
        if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{}", self.origin.trim_end_matches('/'), href)
        }
    }

    /// The last non-empty path segment of the category page, with slashes,
    /// e.g. `/perawatan-bayi/`. Links ending with it point at the category
    /// itself rather than at an article.
    pub fn category_root(&self) -> String {
        let segment = self
            .article_path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        format!("/{}/", segment)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: "https://hellosehat.com".to_string(),
            category_url: "https://hellosehat.com/parenting/bayi/perawatan-bayi/".to_string(),
            article_path: "/parenting/bayi/perawatan-bayi/".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, date: Option<&str>) -> ArticleRecord {
        ArticleRecord {
            url: url.to_string(),
            title: "Title".to_string(),
            content: "Body".to_string(),
            published_date: date.map(|d| DateTime::parse_from_rfc3339(d).unwrap()),
            image_url: None,
            fetch_failed: false,
        }
    }

    #[test]
    fn test_month_year_uses_record_offset() {
        let r = record("https://example.com/a", Some("2024-03-31T23:30:00+07:00"));
        assert_eq!(r.month_year(), Some("2024-03".to_string()));
    }

    #[test]
    fn test_month_year_absent_without_date() {
        let r = record("https://example.com/a", None);
        assert_eq!(r.month_year(), None);
    }

    #[test]
    fn test_failed_record() {
        let r = ArticleRecord::failed("https://example.com/x", "connection refused");
        assert_eq!(r.title, ERROR_TITLE);
        assert_eq!(r.content, "connection refused");
        assert!(r.published_date.is_none());
        assert!(r.image_url.is_none());
        assert!(r.is_error());
    }

    #[test]
    fn test_article_titled_error_is_not_a_failure() {
        let mut r = record("https://example.com/error-codes", None);
        r.title = ERROR_TITLE.to_string();
        assert!(!r.is_error());
    }

    #[test]
    fn test_failure_marker_is_not_serialized() {
        let r = ArticleRecord::failed("https://example.com/x", "timeout");
        let json = serde_json::to_string(&r).unwrap();
        assert!(!json.contains("fetch_failed"));

        let back: ArticleRecord = serde_json::from_str(&json).unwrap();
        assert!(!back.is_error());
    }

    #[test]
    fn test_real_image_skips_sentinel() {
        let mut r = record("https://example.com/a", None);
        r.image_url = Some(NO_IMAGE.to_string());
        assert_eq!(r.real_image(), None);
        r.image_url = Some("https://cdn.example.com/a.jpg".to_string());
        assert_eq!(r.real_image(), Some("https://cdn.example.com/a.jpg"));
    }

    #[test]
    fn test_record_serialization() {
        let r = record("https://example.com/a", Some("2024-05-06T10:00:00+07:00"));
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"url\":\"https://example.com/a\""));
        assert!(json.contains("2024-05-06T10:00:00+07:00"));
        assert!(!json.contains("month_year"));
    }

    #[test]
    fn test_record_deserialization_without_optional_fields() {
        let json = r#"{"url": "https://example.com/b", "title": "T", "content": "C"}"#;
        let r: ArticleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.url, "https://example.com/b");
        assert!(r.published_date.is_none());
        assert!(r.image_url.is_none());
    }

    #[test]
    fn test_page_url() {
        let site = SiteConfig::default();
        assert_eq!(site.page_url(1), site.category_url);
        assert_eq!(
            site.page_url(3),
            "https://hellosehat.com/parenting/bayi/perawatan-bayi/?page=3"
        );
    }

    #[test]
    fn test_absolutize() {
        let site = SiteConfig::default();
        assert_eq!(
            site.absolutize("/parenting/bayi/perawatan-bayi/mandi/"),
            "https://hellosehat.com/parenting/bayi/perawatan-bayi/mandi/"
        );
        assert_eq!(
            site.absolutize("https://other.example/x"),
            "https://other.example/x"
        );
    }

    #[test]
    fn test_category_root() {
        let site = SiteConfig::default();
        assert_eq!(site.category_root(), "/perawatan-bayi/");
    }
}
