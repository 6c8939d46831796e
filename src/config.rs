//! Run configuration.
//!
//! Loading precedence (highest wins):
//! 1. Command-line flags and their environment variables (`DB_URI`)
//! 2. YAML config file given with `--config`
//! 3. Built-in defaults
//!
//! The resulting [`ScraperConfig`] is passed explicitly to every component;
//! nothing reads configuration ambiently.
//!
//! # Example file
//!
//! ```yaml
//! site:
//!   origin: https://hellosehat.com
//!   category_url: https://hellosehat.com/parenting/bayi/perawatan-bayi/
//!   article_path: /parenting/bayi/perawatan-bayi/
//! max_articles: 100
//! page_delay_ms: 1000
//! article_delay_ms: 1000
//! extract_images: true
//! db_uri: sqlite://./articles.sqlite
//! report_dir: ./reports
//! schedule_at: "06:00"
//! ```

use crate::cli::Cli;
use crate::models::SiteConfig;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// The site and category to scrape.
    pub site: SiteConfig,
    /// Maximum number of article links collected per run.
    pub max_articles: usize,
    /// Pause after each listing page fetch.
    pub page_delay_ms: u64,
    /// Pause after each article fetch.
    pub article_delay_ms: u64,
    /// Whether the cover image stage runs.
    pub extract_images: bool,
    /// Article store connection string.
    pub db_uri: String,
    /// Directory receiving the JSON and Markdown reports.
    pub report_dir: String,
    /// User-Agent header for every request.
    pub user_agent: String,
    /// Local time (`HH:MM`) of the daily scheduled run.
    pub schedule_at: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            max_articles: 100,
            page_delay_ms: 1000,
            article_delay_ms: 1000,
            extract_images: true,
            db_uri: "jsonl://./articles.jsonl".to_string(),
            report_dir: "./reports".to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            schedule_at: "06:00".to_string(),
        }
    }
}

impl ScraperConfig {
    /// Load the YAML file at `path`, or the defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let Some(path) = path else {
            debug!("No config file; using defaults");
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        info!(path, "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, Box<dyn Error>> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Apply the flags that were actually given on the command line.
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(ref db_uri) = cli.db_uri {
            self.db_uri = db_uri.clone();
        }
        if let Some(ref dir) = cli.report_dir {
            self.report_dir = dir.clone();
        }
        if let Some(max) = cli.max_articles {
            self.max_articles = max;
        }
        if cli.no_images {
            self.extract_images = false;
        }
        self
    }

    /// Check the values a run cannot proceed without.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        Url::parse(&self.site.origin).map_err(|e| format!("invalid site.origin {:?}: {}", self.site.origin, e))?;
        Url::parse(&self.site.category_url)
            .map_err(|e| format!("invalid site.category_url {:?}: {}", self.site.category_url, e))?;
        if self.site.article_path.trim_matches('/').is_empty() {
            return Err("site.article_path must name a path segment".into());
        }
        if self.db_uri.trim().is_empty() {
            return Err("db_uri must not be empty".into());
        }
        self.schedule_time()?;
        Ok(())
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn article_delay(&self) -> Duration {
        Duration::from_millis(self.article_delay_ms)
    }

    pub fn schedule_time(&self) -> Result<NaiveTime, Box<dyn Error>> {
        parse_time_of_day(&self.schedule_at)
    }
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, Box<dyn Error>> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|e| format!("invalid time of day {:?}: {}", s, e).into())
}
