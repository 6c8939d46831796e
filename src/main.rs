//! # Trend Scraper
//!
//! Scrapes one category of a health news site, keeps every dated article it
//! has ever seen in a persistent store, and reports on what the stored corpus
//! is talking about.
//!
//! ## Features
//!
//! - Pages through the category listing until no new article links appear
//! - Extracts title, body text, publish date and cover image per article
//! - Saves only URLs the store has not seen before (SQLite, JSON Lines or memory)
//! - Reports top words, a word cloud weighting, a gallery and articles per month
//! - Runs once, daily at a fixed local time, or rebuilds the report only
//!
//! ## Usage
//!
//! ```sh
//! trend_scraper run --db-uri sqlite://./articles.sqlite -r ./reports
//! trend_scraper schedule --at 06:00
//! trend_scraper report
//! ```
//!
//! ## Architecture
//!
//! 1. **Discovery**: Collect article URLs from the paginated category listing
//! 2. **Extraction**: Fetch and parse each article, one at a time
//! 3. **Persistence**: Save dated, unseen articles through the dedup gate
//! 4. **Reporting**: Reload the store and write JSON and Markdown reports

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dedup;
mod fetch;
mod models;
mod outputs;
mod pipeline;
mod report;
mod scheduler;
mod scrapers;
mod store;
#[cfg(test)]
mod test_utils;
mod utils;

use cli::{Cli, Command};
use config::ScraperConfig;
use fetch::HttpFetcher;
use store::Store;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("trend_scraper starting up");

    let args = Cli::parse();
    debug!(command = ?args.command, config = ?args.config, "Parsed CLI arguments");

    let mut config = ScraperConfig::load(args.config.as_deref())?.merge_cli(&args);
    if let Command::Schedule { at: Some(ref at) } = args.command {
        config.schedule_at = at.clone();
    }
    config.validate()?;

    if let Err(e) = ensure_writable_dir(&config.report_dir).await {
        error!(
            path = %config.report_dir,
            error = %e,
            "Report directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let store = Store::open(&config.db_uri).await?;

    match args.command {
        Command::Run => {
            let fetcher = HttpFetcher::new(&config.user_agent)?;
            let summary = pipeline::run_once(&config, &fetcher, &store).await?;
            info!(
                discovered = summary.discovered,
                fetched = summary.fetched,
                dated = summary.dated,
                inserted = summary.persisted.inserted_count(),
                stored = summary.report.total_articles,
                outputs = summary.outputs.len(),
                "Execution complete"
            );
            println!(
                "discovered {} | fetched {} | dated {} | new {}{} | stored {}",
                summary.discovered,
                summary.fetched,
                summary.dated,
                summary.persisted.inserted_count(),
                if summary.persisted.is_failed() { " (save failed)" } else { "" },
                summary.report.total_articles
            );
            for path in &summary.outputs {
                println!("wrote {}", path.display());
            }
        }
        Command::Schedule { .. } => {
            let fetcher = HttpFetcher::new(&config.user_agent)?;
            scheduler::run_daily(&config, &fetcher, &store).await?;
        }
        Command::Report => {
            let report = pipeline::report_only(&config, &store).await?;
            info!(
                articles = report.total_articles,
                top_words = report.top_words.len(),
                "Execution complete"
            );
        }
    }

    Ok(())
}
