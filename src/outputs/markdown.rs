//! Markdown report output.
//!
//! The page has one section per artifact: article table, cover gallery,
//! top-word chart, articles-per-month chart and the word-cloud weights.
//! Charts are drawn as horizontal text bars so the page reads fine in a
//! terminal or any Markdown viewer.

use crate::report::Report;
use std::error::Error;
use std::fmt::Write;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Width in characters of the longest bar.
const BAR_WIDTH: usize = 40;

/// Render a [`Report`] as Markdown.
pub fn report_to_markdown(report: &Report) -> String {
    let mut md = String::new();

    writeln!(md, "# Article trends\n").unwrap();
    writeln!(
        md,
        "_Generated {} from {} articles._\n",
        report.generated_at.format("%Y-%m-%d %H:%M"),
        report.total_articles
    )
    .unwrap();

    writeln!(md, "## Articles\n").unwrap();
    if report.articles.is_empty() {
        writeln!(md, "No articles stored yet.\n").unwrap();
    } else {
        writeln!(md, "| Title | URL | Image |").unwrap();
        writeln!(md, "|-------|-----|-------|").unwrap();
        for row in &report.articles {
            writeln!(
                md,
                "| {} | <{}> | {} |",
                escape_cell(&row.title),
                row.url,
                row.image_url.as_deref().map(escape_cell).unwrap_or_default()
            )
            .unwrap();
        }
        writeln!(md).unwrap();
    }

    if !report.gallery.is_empty() {
        writeln!(md, "## Gallery\n").unwrap();
        for item in &report.gallery {
            writeln!(md, "![{}]({})\n", item.title.replace(['[', ']'], ""), item.image_url).unwrap();
        }
    }

    writeln!(md, "## Top {} words\n", report.top_words.len()).unwrap();
    md.push_str(&bar_chart(&report.top_words));

    writeln!(md, "## Articles per month\n").unwrap();
    md.push_str(&bar_chart(&report.articles_per_month));

    writeln!(md, "## Word cloud weights\n").unwrap();
    if report.word_cloud.is_empty() {
        writeln!(md, "No words.\n").unwrap();
    } else {
        let cloud = report
            .word_cloud
            .iter()
            .map(|(word, weight)| format!("{} ({:.2})", word, weight))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(md, "{}\n", cloud).unwrap();
    }

    md
}

/// Render `report` and write it to `{report_dir}/{date}_report.md`.
#[instrument(level = "info", skip_all, fields(report_dir = %report_dir))]
pub async fn write_report(report: &Report, report_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let md = report_to_markdown(report);
    let filename = format!("{}_report.md", report.generated_at.date_naive());
    let path = PathBuf::from(report_dir).join(filename);

    fs::create_dir_all(report_dir).await?;
    fs::write(&path, md).await?;
    info!(path = %path.display(), "Wrote Markdown report");
    Ok(path)
}

/// A fenced block with one labelled bar per entry, scaled to the largest count.
fn bar_chart(entries: &[(String, usize)]) -> String {
    if entries.is_empty() {
        return "No data.\n\n".to_string();
    }

    let max = entries.iter().map(|(_, c)| *c).max().unwrap_or(1).max(1);
    let label_width = entries.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

    let mut out = String::from("```text\n");
    for (label, count) in entries {
        let len = (count * BAR_WIDTH).div_ceil(max);
        writeln!(
            out,
            "{:<width$} {} {}",
            label,
            "█".repeat(len),
            count,
            width = label_width
        )
        .unwrap();
    }
    out.push_str("```\n\n");
    out
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ArticleRow, GalleryItem};
    use chrono::Local;

    fn sample_report() -> Report {
        Report {
            generated_at: Local::now(),
            total_articles: 1,
            articles: vec![ArticleRow {
                title: "Mandi | Bayi".to_string(),
                url: "https://x/a".to_string(),
                image_url: Some("https://cdn.x/a.jpg".to_string()),
                month_year: Some("2024-01".to_string()),
            }],
            gallery: vec![GalleryItem {
                title: "Mandi | Bayi".to_string(),
                image_url: "https://cdn.x/a.jpg".to_string(),
            }],
            top_words: vec![("bayi".to_string(), 4), ("susu".to_string(), 2)],
            word_cloud: vec![("bayi".to_string(), 1.0), ("susu".to_string(), 0.5)],
            articles_per_month: vec![("2024-01".to_string(), 1)],
        }
    }

    #[test]
    fn test_markdown_sections() {
        let md = report_to_markdown(&sample_report());

        assert!(md.contains("# Article trends"));
        assert!(md.contains("| Mandi \\| Bayi | <https://x/a> | https://cdn.x/a.jpg |"));
        assert!(md.contains("![Mandi | Bayi](https://cdn.x/a.jpg)"));
        assert!(md.contains("## Top 2 words"));
        assert!(md.contains("## Articles per month"));
        assert!(md.contains("bayi (1.00), susu (0.50)"));
    }

    #[test]
    fn test_bar_chart_scales_to_max() {
        let chart = bar_chart(&[("a".to_string(), 4), ("b".to_string(), 2)]);
        assert!(chart.contains(&format!("a {} 4", "█".repeat(BAR_WIDTH))));
        assert!(chart.contains(&format!("b {} 2", "█".repeat(BAR_WIDTH / 2))));
    }

    #[test]
    fn test_bar_chart_empty() {
        assert_eq!(bar_chart(&[]), "No data.\n\n");
    }

    #[tokio::test]
    async fn test_write_report_filename() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();
        let path = write_report(&report, dir.path().to_str().unwrap()).await.unwrap();

        let expected = format!("{}_report.md", report.generated_at.date_naive());
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), expected);
        assert!(std::fs::read_to_string(path).unwrap().contains("## Articles"));
    }
}
