use super::{ArticleStore, StoreError};
use crate::models::ArticleRecord;
use std::collections::HashSet;
use tokio::sync::RwLock;

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: RwLock<Vec<ArticleRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }
}

impl ArticleStore for MemoryStore {
    async fn existing_urls(&self) -> Result<HashSet<String>, StoreError> {
        let articles = self.articles.read().await;
        Ok(articles.iter().map(|a| a.url.clone()).collect())
    }

    async fn insert_many(&self, records: &[ArticleRecord]) -> Result<usize, StoreError> {
        let mut articles = self.articles.write().await;
        articles.extend_from_slice(records);
        Ok(records.len())
    }

    async fn load_all(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        Ok(self.articles.read().await.clone())
    }
}
