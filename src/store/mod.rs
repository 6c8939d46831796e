//! Persisted article store.
//!
//! Articles are kept as documents keyed logically by `url`. Three backends
//! implement [`ArticleStore`]:
//!
//! | URI | Backend | Notes |
//! |-----|---------|-------|
//! | `jsonl://<path>` or `<path>.jsonl` | [`JsonlStore`] | One JSON document per line |
//! | `sqlite://<path>`, `sqlite::memory:` | [`SqliteStore`] | `UNIQUE(url)` at the store level |
//! | `memory://` | [`MemoryStore`] | Process-local, for dry runs |
//!
//! The store only offers whole-collection reads and batch inserts. Dedup is
//! the caller's job (see [`crate::dedup`]).

pub mod jsonl;
pub mod memory;
pub mod sqlite;

use crate::models::ArticleRecord;
use std::collections::HashSet;
use tracing::info;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors surfaced by store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be decoded or a record could not be encoded.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite operation failed.
    #[error("sqlite error: {0}")]
    Database(tokio_rusqlite::Error),

    /// A stored row holds a value that is not a valid record field.
    #[error("corrupt record {url}: {reason}")]
    Corrupt { url: String, reason: String },

    /// The connection string names no known backend.
    #[error("unsupported store URI: {0}")]
    UnsupportedUri(String),
}

/// Whole-collection access to persisted articles.
pub trait ArticleStore {
    /// The `url` of every stored record (key projection only).
    async fn existing_urls(&self) -> Result<HashSet<String>, StoreError>;

    /// Insert `records` as one batch and return how many were written.
    async fn insert_many(&self, records: &[ArticleRecord]) -> Result<usize, StoreError>;

    /// Every stored record, in no particular order.
    async fn load_all(&self) -> Result<Vec<ArticleRecord>, StoreError>;
}

/// A store opened from a connection string.
#[derive(Debug)]
pub enum Store {
    Jsonl(JsonlStore),
    Sqlite(SqliteStore),
    Memory(MemoryStore),
}

impl Store {
    /// Open the backend named by `uri`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnsupportedUri`] for unknown schemes, or the
    /// backend's own error if it cannot be opened.
    pub async fn open(uri: &str) -> Result<Self, StoreError> {
        let store = if uri == "sqlite::memory:" {
            Store::Sqlite(SqliteStore::open_in_memory().await?)
        } else if let Some(path) = uri.strip_prefix("sqlite://") {
            Store::Sqlite(SqliteStore::open(path).await?)
        } else if let Some(path) = uri.strip_prefix("jsonl://") {
            Store::Jsonl(JsonlStore::new(path))
        } else if uri.ends_with(".jsonl") && !uri.contains("://") {
            Store::Jsonl(JsonlStore::new(uri))
        } else if uri == "memory://" {
            Store::Memory(MemoryStore::new())
        } else {
            return Err(StoreError::UnsupportedUri(uri.to_string()));
        };

        info!(backend = store.backend_name(), "Opened article store");
        Ok(store)
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Jsonl(_) => "jsonl",
            Store::Sqlite(_) => "sqlite",
            Store::Memory(_) => "memory",
        }
    }
}

impl ArticleStore for Store {
    async fn existing_urls(&self) -> Result<HashSet<String>, StoreError> {
        match self {
            Store::Jsonl(s) => s.existing_urls().await,
            Store::Sqlite(s) => s.existing_urls().await,
            Store::Memory(s) => s.existing_urls().await,
        }
    }

    async fn insert_many(&self, records: &[ArticleRecord]) -> Result<usize, StoreError> {
        match self {
            Store::Jsonl(s) => s.insert_many(records).await,
            Store::Sqlite(s) => s.insert_many(records).await,
            Store::Memory(s) => s.insert_many(records).await,
        }
    }

    async fn load_all(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        match self {
            Store::Jsonl(s) => s.load_all().await,
            Store::Sqlite(s) => s.load_all().await,
            Store::Memory(s) => s.load_all().await,
        }
    }
}
