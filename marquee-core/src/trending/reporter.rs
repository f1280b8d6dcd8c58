//! Trending reporter: reads the trending list and records searches.
//!
//! Recording is a side channel. Its failures are logged and returned as a
//! `RecordOutcome` for inspection, never as an error the caller must handle.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{
    AppwriteTrendingStore, InMemoryTrendingStore, SearchSeed, TrendingError, TrendingRecord,
    TrendingStore,
};
use crate::config::MarqueeConfig;
use crate::movie::Movie;
use crate::query::normalize_query;

/// What happened to a search-count update.
#[derive(Debug)]
pub enum RecordOutcome {
    /// The store accepted the update; carries the record after the write.
    Recorded(TrendingRecord),
    /// Nothing was sent to the store.
    Skipped,
    /// The store rejected the update. Already logged.
    Failed(TrendingError),
}

impl RecordOutcome {
    /// Returns true if the store accepted the update.
    pub fn is_recorded(&self) -> bool {
        matches!(self, RecordOutcome::Recorded(_))
    }
}

/// Front for the trending store used by the search flow.
#[derive(Debug, Clone)]
pub struct TrendingReporter {
    store: Arc<dyn TrendingStore>,
    image_base_url: String,
    limit: usize,
}

impl TrendingReporter {
    /// Creates a reporter over an explicit store.
    pub fn new(store: Arc<dyn TrendingStore>, image_base_url: impl Into<String>, limit: usize) -> Self {
        Self {
            store,
            image_base_url: image_base_url.into(),
            limit,
        }
    }

    /// Creates a reporter for the configured store.
    ///
    /// Uses Appwrite when fully configured, otherwise an in-memory store.
    ///
    /// # Errors
    /// - `TrendingError::NotConfigured` - Appwrite endpoint is malformed
    pub fn from_config(config: &MarqueeConfig) -> Result<Self, TrendingError> {
        let store: Arc<dyn TrendingStore> = if config.trending.is_remote() {
            info!("Recording trending searches in Appwrite");
            Arc::new(AppwriteTrendingStore::from_config(&config.trending)?)
        } else {
            info!("Appwrite not configured, trending searches kept in memory");
            Arc::new(InMemoryTrendingStore::new())
        };

        Ok(Self::new(
            store,
            config.tmdb.image_base_url.clone(),
            config.trending.limit,
        ))
    }

    /// Underlying store.
    pub fn store(&self) -> &Arc<dyn TrendingStore> {
        &self.store
    }

    /// Reads the top trending records in store order.
    ///
    /// # Errors
    /// Propagates the store's `TrendingError`; callers are expected to log
    /// it and carry on with an empty list.
    pub async fn load_trending(&self) -> Result<Vec<TrendingRecord>, TrendingError> {
        self.store.top(self.limit).await
    }

    /// Counts a successful search for `query` whose top result was `top`.
    ///
    /// Empty queries are skipped. Store failures are logged at warn level and
    /// returned as `RecordOutcome::Failed`.
    pub async fn record_search(&self, query: &str, top: &Movie) -> RecordOutcome {
        let search_term = normalize_query(query);
        if search_term.is_empty() {
            return RecordOutcome::Skipped;
        }

        let seed = SearchSeed {
            search_term,
            movie_id: top.id,
            poster_url: top.poster_url(&self.image_base_url),
        };

        match self.store.upsert(seed).await {
            Ok(record) => {
                debug!(term = %record.search_term, count = record.count, "recorded search");
                RecordOutcome::Recorded(record)
            }
            Err(e) => {
                warn!(query, error = %e, "failed to record search count");
                RecordOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    #[derive(Debug)]
    struct FailingStore;

    #[async_trait]
    impl TrendingStore for FailingStore {
        async fn top(&self, _limit: usize) -> Result<Vec<TrendingRecord>, TrendingError> {
            Err(TrendingError::RequestFailed {
                reason: "offline".to_string(),
            })
        }

        async fn upsert(&self, _seed: SearchSeed) -> Result<TrendingRecord, TrendingError> {
            Err(TrendingError::UnexpectedStatus {
                status: 500,
                body: "boom".to_string(),
            })
        }
    }

    fn reporter(store: Arc<dyn TrendingStore>) -> TrendingReporter {
        TrendingReporter::new(store, "https://image.tmdb.org/t/p/w500", 5)
    }

    #[tokio::test]
    async fn test_record_search_builds_poster_url() {
        let store = Arc::new(InMemoryTrendingStore::new());
        let reporter = reporter(store.clone());
        let movie = Movie::new(1, "Batman").with_poster("/p.jpg");

        let outcome = reporter.record_search("  Batman ", &movie).await;

        assert!(outcome.is_recorded());
        let record = store.get("batman").unwrap();
        assert_eq!(record.count, 1);
        assert_eq!(record.movie_id, Some(1));
        assert_eq!(
            record.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/p.jpg")
        );
    }

    #[tokio::test]
    async fn test_empty_query_is_skipped() {
        let store = Arc::new(InMemoryTrendingStore::new());
        let outcome = reporter(store.clone())
            .record_search("   ", &Movie::new(1, "Batman"))
            .await;

        assert!(matches!(outcome, RecordOutcome::Skipped));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed() {
        let outcome = reporter(Arc::new(FailingStore))
            .record_search("batman", &Movie::new(1, "Batman"))
            .await;

        assert!(matches!(
            outcome,
            RecordOutcome::Failed(TrendingError::UnexpectedStatus { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_from_config_falls_back_to_memory() {
        let reporter = TrendingReporter::from_config(&MarqueeConfig::default()).unwrap();
        assert!(reporter.load_trending().await.unwrap().is_empty());
    }
}
