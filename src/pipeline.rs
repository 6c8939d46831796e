//! One scraping run, end to end.
//!
//! 1. **Discovery**: collect article URLs from the category listing
//! 2. **Extraction**: fetch every article, one at a time
//! 3. **Filtering**: drop records without a publish date
//! 4. **Persistence**: save unseen URLs through the dedup gate
//! 5. **Reporting**: reload the whole store and build the report
//! 6. **Output**: write the JSON and Markdown report files
//!
//! Only a discovery failure or a failed reload of the store aborts the run.
//! Article failures become placeholder records, and save or output failures
//! are logged and skipped.

use crate::config::ScraperConfig;
use crate::dedup::{PersistOutcome, persist_new};
use crate::fetch::PageFetcher;
use crate::models::ArticleRecord;
use crate::outputs::{json, markdown};
use crate::report::{Report, TOP_WORDS, build_report};
use crate::scrapers;
use crate::store::ArticleStore;
use crate::utils::truncate_for_log;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// What a run did.
#[derive(Debug)]
pub struct RunSummary {
    /// Article URLs found on the listing.
    pub discovered: usize,
    /// Articles whose fetch and parse succeeded.
    pub fetched: usize,
    /// Articles that fetched fine and carry a publish date.
    pub dated: usize,
    /// Result of the dedup gate.
    pub persisted: PersistOutcome,
    /// Report built from the whole store after the save.
    pub report: Report,
    /// Report files that were written.
    pub outputs: Vec<PathBuf>,
}

/// Run the full pipeline once.
///
/// # Errors
///
/// Fails when discovery fails or the store cannot be read back for the
/// report. Everything else is recovered and logged.
#[instrument(level = "info", skip_all, fields(category = %config.site.category_url))]
pub async fn run_once<F, S>(config: &ScraperConfig, fetcher: &F, store: &S) -> Result<RunSummary, Box<dyn Error>>
where
    F: PageFetcher,
    S: ArticleStore,
{
    let start_time = Instant::now();

    let links = scrapers::discover(fetcher, &config.site, config.max_articles, config.page_delay()).await?;
    info!(count = links.len(), "Found article links");

    let records = scrape_all(config, fetcher, &links).await;
    let fetched = records.iter().filter(|r| !r.is_error()).count();

    let dated = drop_undated(records);
    info!(
        fetched,
        dated = dated.len(),
        dropped = links.len() - dated.len(),
        "Filtered articles without publish date"
    );
    let dated_count = dated.len();

    let persisted = persist_new(store, dated).await;
    match &persisted {
        PersistOutcome::Inserted(n) => info!(inserted = n, "Saved new articles"),
        PersistOutcome::NothingNew => info!("Nothing new to save"),
        PersistOutcome::Failed(e) => error!(error = %e, "Saving failed; continuing without save"),
    }

    let stored = store.load_all().await?;
    let report = build_report(&stored, TOP_WORDS);
    let outputs = write_outputs(&report, &config.report_dir).await;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        discovered = links.len(),
        inserted = persisted.inserted_count(),
        stored = stored.len(),
        "Run complete"
    );

    Ok(RunSummary {
        discovered: links.len(),
        fetched,
        dated: dated_count,
        persisted,
        report,
        outputs,
    })
}

/// Fetch every link in order, pausing after each article.
pub async fn scrape_all<F: PageFetcher>(config: &ScraperConfig, fetcher: &F, links: &[String]) -> Vec<ArticleRecord> {
    let mut records = Vec::with_capacity(links.len());
    for (i, url) in links.iter().enumerate() {
        let record = scrapers::extract(fetcher, &config.site, url, config.extract_images).await;
        if record.is_error() {
            warn!(
                index = i,
                %url,
                error = %truncate_for_log(&record.content, 200),
                "Keeping failed article as placeholder"
            );
        }
        records.push(record);
        sleep(config.article_delay()).await;
    }
    info!(count = records.len(), "Fetched article contents");
    records
}

/// Keep only records that carry a publish date.
pub fn drop_undated(records: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    records
        .into_iter()
        .filter(|r| r.published_date.is_some())
        .collect()
}

/// Write the report files; failures are logged and leave the file out.
pub async fn write_outputs(report: &Report, report_dir: &str) -> Vec<PathBuf> {
    let mut written = Vec::new();

    match json::write_report(report, report_dir).await {
        Ok(path) => written.push(path),
        Err(e) => error!(error = %e, "Failed to write JSON report"),
    }
    match markdown::write_report(report, report_dir).await {
        Ok(path) => written.push(path),
        Err(e) => error!(error = %e, "Failed to write Markdown report"),
    }

    written
}

/// Rebuild and write the report from the store alone.
#[instrument(level = "info", skip_all)]
pub async fn report_only<S: ArticleStore>(config: &ScraperConfig, store: &S) -> Result<Report, Box<dyn Error>> {
    let stored = store.load_all().await?;
    let report = build_report(&stored, TOP_WORDS);
    write_outputs(&report, &config.report_dir).await;
    info!(stored = stored.len(), reported = report.total_articles, "Report written");
    Ok(report)
}
