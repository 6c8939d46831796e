//! JSON report output.

use crate::report::Report;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`Report`] to `{report_dir}/{date}/report.json`.
///
/// The date is the local date the report was generated on.
///
/// # Returns
///
/// The path written, or an error if directory creation or the write fails.
#[instrument(level = "info", skip_all, fields(report_dir = %report_dir))]
pub async fn write_report(report: &Report, report_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    let date = report.generated_at.date_naive().to_string();
    let full_json_dir = PathBuf::from(report_dir).join(&date);

    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = full_json_dir.join("report.json");
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON report");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{TOP_WORDS, build_report};
    use crate::test_utils::record;

    #[tokio::test]
    async fn test_write_report_layout() {
        let dir = tempfile::tempdir().unwrap();
        let report = build_report(
            &[record("https://x/a", Some("2024-01-05T00:00:00+00:00"))],
            TOP_WORDS,
        );

        let path = write_report(&report, dir.path().to_str().unwrap()).await.unwrap();
        let date = report.generated_at.date_naive().to_string();
        assert_eq!(path, dir.path().join(date).join("report.json"));

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: Report = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.total_articles, 1);
        assert_eq!(parsed.articles[0].url, "https://x/a");
    }
}
