//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Global options can also come from environment variables or the YAML
//! config file; a flag given on the command line always wins.

use clap::{Parser, Subcommand};

/// Command-line arguments for the trend scraper.
///
/// # Examples
///
/// ```sh
/// # One scrape, save new articles, write reports
/// trend_scraper run --db-uri sqlite://./articles.sqlite -r ./reports
///
/// # Scrape every day at 06:00 without a terminal
/// DB_URI=jsonl://./articles.jsonl trend_scraper schedule --at 06:00
///
/// # Rebuild the reports from what is already stored
/// trend_scraper report
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Article store connection string (sqlite://, jsonl://, memory://)
    #[arg(long, env = "DB_URI", global = true)]
    pub db_uri: Option<String>,

    /// Output directory for the JSON and Markdown reports
    #[arg(short, long, global = true)]
    pub report_dir: Option<String>,

    /// Maximum number of article links to collect per run
    #[arg(short, long, global = true)]
    pub max_articles: Option<usize>,

    /// Skip cover image extraction
    #[arg(long, global = true)]
    pub no_images: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Scrape once, save new articles and write reports
    Run,
    /// Scrape once a day at a fixed local time
    Schedule {
        /// Local wall-clock time as HH:MM
        #[arg(long)]
        at: Option<String>,
    },
    /// Write reports from the stored articles without scraping
    Report,
}
