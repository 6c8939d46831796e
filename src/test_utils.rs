//! Shared test fixtures.

use crate::fetch::PageFetcher;
use crate::models::{ArticleRecord, SiteConfig};
use chrono::DateTime;
use std::collections::HashMap;
use std::error::Error;
use std::sync::Mutex;

/// [`PageFetcher`] serving canned pages and recording every requested URL.
///
/// Unknown URLs fail like a transport error would.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        self.requested.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| format!("connection refused: {}", url).into())
    }
}

pub fn test_site() -> SiteConfig {
    SiteConfig::default()
}

/// Listing page linking to one article per slug, plus a link back to the category.
pub fn listing_page(slugs: &[&str]) -> String {
    let site = test_site();
    let mut html = String::from("<html><body><nav>");
    html.push_str(&format!("<a href=\"{}\">Home</a>", site.article_path));
    html.push_str("</nav><main>");
    for slug in slugs {
        html.push_str(&format!(
            "<a href=\"{}{}/\">{}</a>",
            site.article_path, slug, slug
        ));
    }
    html.push_str("</main></body></html>");
    html
}

/// Article page with a title, two paragraphs and an optional publish date.
pub fn article_page(title: &str, published: Option<&str>) -> String {
    let meta = published
        .map(|d| format!("<meta property=\"article:published_time\" content=\"{}\">", d))
        .unwrap_or_default();
    format!(
        "<html><head>{}</head><body><h1>{}</h1><p>Bayi perlu tidur cukup.</p><p>Mandi bayi setiap pagi.</p></body></html>",
        meta, title
    )
}

pub fn record(url: &str, date: Option<&str>) -> ArticleRecord {
    ArticleRecord {
        url: url.to_string(),
        title: format!("Title for {}", url),
        content: "bayi tidur mandi".to_string(),
        published_date: date.map(|d| DateTime::parse_from_rfc3339(d).unwrap()),
        image_url: None,
        fetch_failed: false,
    }
}
