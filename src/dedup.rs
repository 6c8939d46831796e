//! The dedup persistence gate.
//!
//! A run only ever adds records whose URL is not stored yet. The gate reads
//! the stored URLs, takes the set difference against the freshly scraped
//! candidates, and inserts what is left in one batch.
//!
//! The read and the insert are two separate store calls. With the document
//! backends two overlapping runs can both see a URL as unseen and insert it
//! twice; the SQLite backend ignores the second insert through its unique
//! constraint.

use crate::models::ArticleRecord;
use crate::store::{ArticleStore, StoreError};
use itertools::Itertools;
use tracing::{error, info, instrument};

/// What the gate did with a batch of candidates.
#[derive(Debug)]
pub enum PersistOutcome {
    /// This many new records were written.
    Inserted(usize),
    /// Every candidate was already stored; nothing was written.
    NothingNew,
    /// The store failed; treat as nothing inserted.
    Failed(StoreError),
}

impl PersistOutcome {
    pub fn inserted_count(&self) -> usize {
        match self {
            PersistOutcome::Inserted(n) => *n,
            _ => 0,
        }
    }

    pub fn any_inserted(&self) -> bool {
        self.inserted_count() > 0
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PersistOutcome::Failed(_))
    }
}

/// Persist the candidates whose URL is not stored yet.
///
/// Candidates repeating a URL within the batch are collapsed to the first
/// occurrence. Store failures are logged and returned as
/// [`PersistOutcome::Failed`], never retried.
#[instrument(level = "info", skip_all, fields(candidates = candidates.len()))]
pub async fn persist_new<S: ArticleStore>(store: &S, candidates: Vec<ArticleRecord>) -> PersistOutcome {
    let existing = match store.existing_urls().await {
        Ok(urls) => urls,
        Err(e) => {
            error!(error = %e, "Failed to read stored URLs; nothing saved");
            return PersistOutcome::Failed(e);
        }
    };

    let fresh: Vec<ArticleRecord> = candidates
        .into_iter()
        .filter(|r| !existing.contains(&r.url))
        .unique_by(|r| r.url.clone())
        .collect();

    if fresh.is_empty() {
        info!(stored = existing.len(), "No new articles to save");
        return PersistOutcome::NothingNew;
    }

    match store.insert_many(&fresh).await {
        Ok(0) => {
            info!("Store skipped every new article");
            PersistOutcome::NothingNew
        }
        Ok(n) => {
            info!(inserted = n, stored_before = existing.len(), "Saved new articles");
            PersistOutcome::Inserted(n)
        }
        Err(e) => {
            error!(error = %e, pending = fresh.len(), "Failed to save new articles");
            PersistOutcome::Failed(e)
        }
    }
}
