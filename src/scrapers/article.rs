//! Article field extraction.
//!
//! Fields are pulled out of the article HTML with fixed selectors:
//!
//! | Field | Source |
//! |-------|--------|
//! | title | first `h1`, else [`NO_TITLE`] |
//! | content | every `p`, space-joined in document order |
//! | published date | `meta[property="article:published_time"]` |
//! | cover image | `og:image`, `twitter:image`, first `img`, first `figure img` |
//!
//! The cover image is an optional stage; when it does not run, `image_url`
//! stays `None`.

use crate::fetch::PageFetcher;
use crate::models::{ArticleRecord, NO_IMAGE, NO_TITLE, SiteConfig};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::{debug, instrument, warn};

/// Offset-carrying layouts tried after RFC 3339 and RFC 2822.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S %z",
];

/// Layouts without an offset; interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%d %B %Y", "%b %d, %Y"];

/// Fetch one article and extract its fields.
///
/// This never fails: a fetch or parse error yields an
/// [`ArticleRecord::failed`] placeholder carrying the error text.
#[instrument(level = "info", skip(fetcher, site))]
pub async fn extract<F: PageFetcher>(
    fetcher: &F,
    site: &SiteConfig,
    url: &str,
    with_image: bool,
) -> ArticleRecord {
    let html = match fetcher.fetch(url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Article fetch failed");
            return ArticleRecord::failed(url, e);
        }
    };

    match parse_article(&html, url, site, with_image) {
        Ok(record) => {
            debug!(
                title = %record.title,
                bytes = record.content.len(),
                has_date = record.published_date.is_some(),
                "Parsed article"
            );
            record
        }
        Err(e) => {
            warn!(error = %e, "Article parse failed");
            ArticleRecord::failed(url, e)
        }
    }
}

/// Extract an [`ArticleRecord`] from article HTML.
///
/// # Errors
///
/// Fails when the publish date meta tag is present but unparseable.
pub fn parse_article(
    html: &str,
    url: &str,
    site: &SiteConfig,
    with_image: bool,
) -> Result<ArticleRecord, Box<dyn Error>> {
    let document = Html::parse_document(html);
    let title_selector = Selector::parse("h1")?;
    let paragraph_selector = Selector::parse("p")?;
    let date_selector = Selector::parse(r#"meta[property="article:published_time"]"#)?;

    let title = document
        .select(&title_selector)
        .next()
        .map(element_text)
        .unwrap_or_else(|| NO_TITLE.to_string());

    let content = document.select(&paragraph_selector).map(element_text).join(" ");

    let published_date = match document
        .select(&date_selector)
        .next()
        .and_then(|m| m.value().attr("content"))
        .filter(|c| !c.trim().is_empty())
    {
        Some(raw) => Some(parse_published_date(raw)?),
        None => None,
    };

    let image_url = if with_image {
        Some(cover_image(&document, site)?.unwrap_or_else(|| NO_IMAGE.to_string()))
    } else {
        None
    };

    Ok(ArticleRecord {
        url: url.to_string(),
        title,
        content,
        published_date,
        image_url,
        fetch_failed: false,
    })
}

/// Find the cover image, trying each source in priority order.
fn cover_image(document: &Html, site: &SiteConfig) -> Result<Option<String>, Box<dyn Error>> {
    let candidates = [
        (r#"meta[property="og:image"]"#, "content"),
        (r#"meta[name="twitter:image"]"#, "content"),
        ("img[src]", "src"),
        ("figure img[src]", "src"),
    ];

    for (selector, attr) in candidates {
        let selector = Selector::parse(selector)?;
        let found = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr(attr))
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(src) = found {
            return Ok(Some(normalize_image_url(src, site)));
        }
    }
    Ok(None)
}

/// Make protocol-relative and root-relative image paths absolute.
pub fn normalize_image_url(src: &str, site: &SiteConfig) -> String {
    if src.starts_with("//") {
        format!("https:{}", src)
    } else if src.starts_with('/') {
        format!("{}{}", site.origin.trim_end_matches('/'), src)
    } else {
        src.to_string()
    }
}

/// Parse a publish date string in any of the common layouts.
///
/// Strings without an offset are taken as UTC; date-only strings as midnight UTC.
pub fn parse_published_date(raw: &str) -> Result<DateTime<FixedOffset>, Box<dyn Error>> {
    let s = raw.trim();

    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Ok(d);
    }
    if let Ok(d) = DateTime::parse_from_rfc2822(s) {
        return Ok(d);
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(d) = DateTime::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&naive).fixed_offset());
        }
    }
    for fmt in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&date.and_time(Default::default())).fixed_offset());
        }
    }

    Err(format!("unrecognized publish date: {:?}", raw).into())
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).filter(|t| !t.is_empty()).join(" ")
}
