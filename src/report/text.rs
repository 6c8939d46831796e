//! Text normalization for word statistics.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S+|www\.\S+").unwrap());
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());

/// Words that only add noise on top of the two language lists.
const CUSTOM_STOPWORDS: &[&str] = &["retrieved", "www", "http", "https", "com", "org", "si", "hello", "n"];

/// English and Indonesian stop-words plus [`CUSTOM_STOPWORDS`].
pub static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    include_str!("../../resources/stopwords/english.txt")
        .lines()
        .chain(include_str!("../../resources/stopwords/indonesian.txt").lines())
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .chain(CUSTOM_STOPWORDS.iter().copied())
        .collect()
});

/// Turn free text into the tokens that feed word counts.
///
/// Lower-cases, drops URLs, splits on word boundaries, keeps only ASCII
/// letters within each token, and removes empty tokens and stop-words.
pub fn normalize_text(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let without_urls = URL_RE.replace_all(&lowered, " ");

    WORD_RE
        .find_iter(&without_urls)
        .map(|m| {
            m.as_str()
                .chars()
                .filter(|c| c.is_ascii_alphabetic())
                .collect::<String>()
        })
        .filter(|w| !w.is_empty() && !STOPWORDS.contains(w.as_str()))
        .collect()
}
