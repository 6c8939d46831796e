//! SQLite-backed article store.
//!
//! Unlike the document backends, this one enforces `UNIQUE(url)` in the
//! schema and inserts with `INSERT OR IGNORE`, so two runs racing between
//! the dedup read and the insert cannot double-insert a URL.

use super::{ArticleStore, StoreError};
use crate::models::ArticleRecord;
use chrono::DateTime;
use std::collections::HashSet;
use std::path::Path;
use tokio_rusqlite::{Connection, params};
use tracing::{debug, instrument};

/// Schema statements, applied in order on every open. Each is idempotent.
const MIGRATIONS: &[&str] = &[r#"
    CREATE TABLE IF NOT EXISTS articles (
        url TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        published_date TEXT,
        image_url TEXT,
        inserted_at TEXT NOT NULL
    )
    "#];

type Row = (String, String, String, Option<String>, Option<String>);

#[derive(Clone, Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file at `path` and apply the schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::Database(e.into()))?;
        Self::migrate(conn).await
    }

    /// Open a throwaway in-memory database with the same schema.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::Database(e.into()))?;
        Self::migrate(conn).await
    }

    async fn migrate(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| {
            conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
            for migration in MIGRATIONS {
                conn.execute_batch(migration)?;
            }
            Ok(())
        })
        .await
        .map_err(StoreError::Database)?;

        Ok(Self { conn })
    }
}

impl ArticleStore for SqliteStore {
    #[instrument(level = "debug", skip_all)]
    async fn existing_urls(&self) -> Result<HashSet<String>, StoreError> {
        let urls = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT url FROM articles")?;
                let urls = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<HashSet<_>, _>>()?;
                Ok(urls)
            })
            .await
            .map_err(StoreError::Database)?;
        debug!(count = urls.len(), "Read stored URLs");
        Ok(urls)
    }

    /// Insert in one transaction. URLs already present are skipped by the
    /// unique constraint and not counted.
    #[instrument(level = "debug", skip_all, fields(count = records.len()))]
    async fn insert_many(&self, records: &[ArticleRecord]) -> Result<usize, StoreError> {
        let rows: Vec<Row> = records
            .iter()
            .map(|r| {
                (
                    r.url.clone(),
                    r.title.clone(),
                    r.content.clone(),
                    r.published_date.map(|d| d.to_rfc3339()),
                    r.image_url.clone(),
                )
            })
            .collect();
        let inserted_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut written = 0usize;
                {
                    let mut stmt = tx.prepare(
                        "INSERT OR IGNORE INTO articles
                            (url, title, content, published_date, image_url, inserted_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    )?;
                    for (url, title, content, published_date, image_url) in &rows {
                        written += stmt.execute(params![
                            url,
                            title,
                            content,
                            published_date,
                            image_url,
                            inserted_at
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(written)
            })
            .await
            .map_err(StoreError::Database)
    }

    #[instrument(level = "debug", skip_all)]
    async fn load_all(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        let rows: Vec<Row> = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT url, title, content, published_date, image_url FROM articles",
                )?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
                    })?
                    .collect::<Result<Vec<Row>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(StoreError::Database)?;

        rows.into_iter()
            .map(|(url, title, content, published_date, image_url)| {
                let published_date = published_date
                    .map(|d| DateTime::parse_from_rfc3339(&d))
                    .transpose()
                    .map_err(|e| StoreError::Corrupt {
                        url: url.clone(),
                        reason: e.to_string(),
                    })?;
                Ok(ArticleRecord {
                    url,
                    title,
                    content,
                    published_date,
                    image_url,
                    fetch_failed: false,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::record;

    #[tokio::test]
    async fn test_roundtrip_preserves_fields() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let mut r = record("https://example.com/a", Some("2024-05-06T08:00:00+07:00"));
        r.image_url = Some("https://cdn.example.com/a.jpg".to_string());

        assert_eq!(store.insert_many(&[r.clone()]).await.unwrap(), 1);
        let all = store.load_all().await.unwrap();
        assert_eq!(all, vec![r]);
    }

    #[tokio::test]
    async fn test_unique_url_constraint() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let a = record("https://example.com/a", None);
        let b = record("https://example.com/b", None);

        assert_eq!(store.insert_many(&[a.clone()]).await.unwrap(), 1);
        assert_eq!(store.insert_many(&[a, b]).await.unwrap(), 1);

        let urls = store.existing_urls().await.unwrap();
        assert_eq!(urls.len(), 2);
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db/articles.sqlite");
        {
            let store = SqliteStore::open(&path).await.unwrap();
            store
                .insert_many(&[record("https://example.com/a", None)])
                .await
                .unwrap();
        }
        let reopened = SqliteStore::open(&path).await.unwrap();
        assert!(reopened.existing_urls().await.unwrap().contains("https://example.com/a"));
    }
}
