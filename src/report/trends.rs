//! Word frequency and publishing cadence.

use crate::models::ArticleRecord;
use itertools::Itertools;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// The `n` most frequent tokens, by descending count.
///
/// Equal counts are ordered alphabetically so reports are reproducible;
/// callers should not rely on that order.
pub fn top_words<S: AsRef<str>>(tokens: &[S], n: usize) -> Vec<(String, usize)> {
    tokens
        .iter()
        .map(|t| t.as_ref())
        .counts()
        .into_iter()
        .sorted_by_key(|(word, count)| (Reverse(*count), *word))
        .take(n)
        .map(|(word, count)| (word.to_string(), count))
        .collect()
}

/// Scale counts so the most frequent word weighs `1.0`.
///
/// The weights are the input of a word-cloud renderer: font size is
/// proportional to weight.
pub fn word_cloud_weights(freqs: &[(String, usize)]) -> Vec<(String, f64)> {
    let max = freqs.iter().map(|(_, c)| *c).max().unwrap_or(0);
    if max == 0 {
        return Vec::new();
    }
    freqs
        .iter()
        .map(|(word, count)| (word.clone(), *count as f64 / max as f64))
        .collect()
}

/// Number of records per `YYYY-MM` bucket, oldest first.
///
/// Records without a publish date are not counted.
pub fn articles_per_month(records: &[ArticleRecord]) -> Vec<(String, usize)> {
    let mut buckets: BTreeMap<String, usize> = BTreeMap::new();
    for month in records.iter().filter_map(ArticleRecord::month_year) {
        *buckets.entry(month).or_insert(0) += 1;
    }
    buckets.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::record;

    fn tokens(counts: &[(&str, usize)]) -> Vec<String> {
        counts.iter()
            .flat_map(|(w, n)| std::iter::repeat(w.to_string()).take(*n))
            .collect()
    }

    #[test]
    fn test_top_words_ties_keep_both_leaders() {
        let toks = tokens(&[("c", 3), ("a", 5), ("b", 5)]);
        let top = top_words(&toks, 2);

        assert_eq!(top.len(), 2);
        let words: Vec<&str> = top.iter().map(|(w, _)| w.as_str()).collect();
        assert!(words.contains(&"a"));
        assert!(words.contains(&"b"));
        assert!(top.iter().all(|(_, c)| *c == 5));
    }

    #[test]
    fn test_top_words_descending() {
        let toks = tokens(&[("x", 1), ("y", 4), ("z", 2)]);
        let top = top_words(&toks, 20);
        assert_eq!(
            top,
            vec![("y".to_string(), 4), ("z".to_string(), 2), ("x".to_string(), 1)]
        );
    }

    #[test]
    fn test_top_words_empty() {
        let toks: Vec<String> = Vec::new();
        assert!(top_words(&toks, 20).is_empty());
    }

    #[test]
    fn test_word_cloud_weights() {
        let freqs = vec![("bayi".to_string(), 8), ("susu".to_string(), 2)];
        let weights = word_cloud_weights(&freqs);
        assert_eq!(weights[0], ("bayi".to_string(), 1.0));
        assert_eq!(weights[1], ("susu".to_string(), 0.25));
        assert!(word_cloud_weights(&[]).is_empty());
    }

    #[test]
    fn test_articles_per_month_sorted_and_skips_undated() {
        let records = vec![
            record("https://x/a", Some("2024-03-10T00:00:00+00:00")),
            record("https://x/b", Some("2023-12-01T00:00:00+00:00")),
            record("https://x/c", Some("2024-03-28T00:00:00+00:00")),
            record("https://x/d", None),
        ];
        assert_eq!(
            articles_per_month(&records),
            vec![("2023-12".to_string(), 1), ("2024-03".to_string(), 2)]
        );
    }
}
