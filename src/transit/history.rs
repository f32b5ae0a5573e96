//! Transit search history
//!
//! Recent searches and the last used search, kept in the local store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::store::{LocalStore, StoreResult};

const HISTORY_KEY: &str = "sbb:history";
const LAST_SEARCH_KEY: &str = "sbb:lastSearch";

/// Number of searches kept by default
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// One remembered search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub datetime: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl SearchRecord {
    pub fn new(from: impl Into<String>, to: impl Into<String>, datetime: Option<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            datetime,
            timestamp: Utc::now(),
        }
    }
}

/// Newest-first list of searches
pub struct SearchHistory {
    store: Arc<LocalStore>,
    limit: usize,
}

impl SearchHistory {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self {
            store,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Prepend a search, dropping the oldest beyond the limit
    pub async fn save_search(&self, record: SearchRecord) -> StoreResult<()> {
        let limit = self.limit;
        self.store
            .update(HISTORY_KEY, Vec::new(), move |history: &mut Vec<SearchRecord>| {
                history.insert(0, record);
                history.truncate(limit);
            })
            .await?;
        Ok(())
    }

    pub async fn history(&self) -> Vec<SearchRecord> {
        self.store.get(HISTORY_KEY, Vec::new()).await
    }

    pub async fn save_last_search(&self, record: &SearchRecord) -> StoreResult<()> {
        self.store.set(LAST_SEARCH_KEY, record).await
    }

    pub async fn last_search(&self) -> Option<SearchRecord> {
        self.store.get(LAST_SEARCH_KEY, None).await
    }

    /// Remember a search both in the history and as the last search.
    /// Persistence failures are logged and otherwise ignored.
    pub async fn record(&self, record: SearchRecord) {
        if let Err(e) = self.save_last_search(&record).await {
            tracing::warn!(error = %e, "Failed to save last transit search");
        }
        if let Err(e) = self.save_search(record).await {
            tracing::warn!(error = %e, "Failed to save transit search history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn history_in(dir: &std::path::Path) -> SearchHistory {
        SearchHistory::new(Arc::new(LocalStore::open_in(dir).await))
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_capped() {
        let dir = tempdir().unwrap();
        let history = history_in(dir.path()).await;

        for i in 0..12 {
            history
                .save_search(SearchRecord::new(format!("from-{}", i), "Bern", None))
                .await
                .unwrap();
        }

        let entries = history.history().await;
        assert_eq!(entries.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(entries[0].from, "from-11");
        assert_eq!(entries[9].from, "from-2");
    }

    #[tokio::test]
    async fn test_concurrent_searches_are_all_kept() {
        let dir = tempdir().unwrap();
        let history = history_in(dir.path()).await;

        let saves = (0..5).map(|i| history.save_search(SearchRecord::new(format!("from-{}", i), "Bern", None)));
        for result in futures_util::future::join_all(saves).await {
            result.unwrap();
        }

        let mut froms: Vec<String> = history.history().await.into_iter().map(|r| r.from).collect();
        froms.sort();
        assert_eq!(froms, vec!["from-0", "from-1", "from-2", "from-3", "from-4"]);
    }

    #[tokio::test]
    async fn test_concurrent_records_respect_limit() {
        let dir = tempdir().unwrap();
        let history = history_in(dir.path()).await.with_limit(3);

        let records = (0..8).map(|i| history.record(SearchRecord::new(format!("from-{}", i), "Bern", None)));
        futures_util::future::join_all(records).await;

        assert_eq!(history.history().await.len(), 3);
        assert!(history.last_search().await.is_some());
    }

    #[tokio::test]
    async fn test_custom_limit() {
        let dir = tempdir().unwrap();
        let history = history_in(dir.path()).await.with_limit(2);

        for from in ["a", "b", "c"] {
            history
                .save_search(SearchRecord::new(from, "x", None))
                .await
                .unwrap();
        }

        let froms: Vec<String> = history.history().await.into_iter().map(|r| r.from).collect();
        assert_eq!(froms, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn test_last_search_round_trip() {
        let dir = tempdir().unwrap();
        let history = history_in(dir.path()).await;
        assert!(history.last_search().await.is_none());

        let record = SearchRecord::new("Zürich HB", "Bern", Some("2025-01-15T14:30:00".into()));
        history.record(record.clone()).await;

        let reopened = history_in(dir.path()).await;
        assert_eq!(reopened.last_search().await, Some(record.clone()));
        assert_eq!(reopened.history().await, vec![record]);
    }
}
