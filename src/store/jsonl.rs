//! JSON-lines document store.
//!
//! The collection is a single file holding one serialized [`ArticleRecord`]
//! per line. Inserts append; reads scan the whole file. A missing file is an
//! empty collection.

use super::{ArticleStore, StoreError};
use crate::models::ArticleRecord;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

/// Projection of a stored document onto its key field.
#[derive(Deserialize)]
struct UrlOnly {
    url: String,
}

#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file contents, or an empty string if the collection was never written.
    async fn read_lines(&self) -> Result<String, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(s) => Ok(s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl ArticleStore for JsonlStore {
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    async fn existing_urls(&self) -> Result<HashSet<String>, StoreError> {
        let text = self.read_lines().await?;
        let mut urls = HashSet::new();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let doc: UrlOnly = serde_json::from_str(line)?;
            urls.insert(doc.url);
        }
        debug!(count = urls.len(), "Read stored URLs");
        Ok(urls)
    }

    #[instrument(level = "debug", skip_all, fields(path = %self.path.display(), count = records.len()))]
    async fn insert_many(&self, records: &[ArticleRecord]) -> Result<usize, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut batch = String::new();
        for record in records {
            batch.push_str(&serde_json::to_string(record)?);
            batch.push('\n');
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(batch.as_bytes()).await?;
        file.flush().await?;

        Ok(records.len())
    }

    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    async fn load_all(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        let text = self.read_lines().await?;
        let records = text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(serde_json::from_str::<ArticleRecord>)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = records.len(), "Loaded stored records");
        Ok(records)
    }
}
