//! Aggregation and reporting over the persisted articles.
//!
//! Everything here is a pure transform of a fully loaded table of records
//! into display artifacts. Nothing is written back to the store.
//!
//! # Submodules
//!
//! - [`text`]: Lower-casing, URL and symbol stripping, stop-word removal
//! - [`trends`]: Top words, word-cloud weights, articles per month

pub mod text;
pub mod trends;

use crate::models::ArticleRecord;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub use text::normalize_text;
pub use trends::{articles_per_month, top_words, word_cloud_weights};

/// Number of words shown in the frequency chart.
pub const TOP_WORDS: usize = 20;

/// One row of the article table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleRow {
    pub title: String,
    pub url: String,
    pub image_url: Option<String>,
    pub month_year: Option<String>,
}

/// An entry of the cover image gallery.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GalleryItem {
    pub title: String,
    pub image_url: String,
}

/// Every artifact rendered for one view of the store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Local>,
    pub total_articles: usize,
    pub articles: Vec<ArticleRow>,
    pub gallery: Vec<GalleryItem>,
    pub top_words: Vec<(String, usize)>,
    pub word_cloud: Vec<(String, f64)>,
    pub articles_per_month: Vec<(String, usize)>,
}

/// Build the report for `records`.
///
/// Records without a publish date are left out entirely. The word corpus is
/// every title followed by every body. The word cloud uses the full frequency
/// table, the chart only its `top_n` head.
pub fn build_report(records: &[ArticleRecord], top_n: usize) -> Report {
    let dated: Vec<ArticleRecord> = records
        .iter()
        .filter(|r| r.published_date.is_some())
        .cloned()
        .collect();

    let corpus = dated
        .iter()
        .map(|r| r.title.as_str())
        .chain(dated.iter().map(|r| r.content.as_str()))
        .collect::<Vec<_>>()
        .join(" ");
    let tokens = normalize_text(&corpus);
    let all_freqs = top_words(&tokens, usize::MAX);

    let articles = dated
        .iter()
        .map(|r| ArticleRow {
            title: r.title.clone(),
            url: r.url.clone(),
            image_url: r.image_url.clone(),
            month_year: r.month_year(),
        })
        .collect();

    let gallery = dated
        .iter()
        .filter_map(|r| {
            r.real_image().map(|img| GalleryItem {
                title: r.title.clone(),
                image_url: img.to_string(),
            })
        })
        .collect();

    Report {
        generated_at: Local::now(),
        total_articles: dated.len(),
        articles,
        gallery,
        top_words: all_freqs.iter().take(top_n).cloned().collect(),
        word_cloud: word_cloud_weights(&all_freqs),
        articles_per_month: articles_per_month(&dated),
    }
}
