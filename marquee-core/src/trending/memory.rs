//! In-process trending store.
//!
//! Used when no hosted store is configured, and as the store behind tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{SearchSeed, TrendingError, TrendingRecord, TrendingStore};

/// Trending store kept in a mutex-guarded map. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct InMemoryTrendingStore {
    records: Mutex<HashMap<String, TrendingRecord>>,
}

impl InMemoryTrendingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for a search term, if any.
    pub fn get(&self, search_term: &str) -> Option<TrendingRecord> {
        self.records.lock().get(search_term).cloned()
    }

    /// Number of distinct search terms stored.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl TrendingStore for InMemoryTrendingStore {
    async fn top(&self, limit: usize) -> Result<Vec<TrendingRecord>, TrendingError> {
        let mut records: Vec<TrendingRecord> = self.records.lock().values().cloned().collect();

        records.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.search_term.cmp(&b.search_term))
        });
        records.truncate(limit);

        Ok(records)
    }

    async fn upsert(&self, seed: SearchSeed) -> Result<TrendingRecord, TrendingError> {
        if seed.search_term.is_empty() {
            return Err(TrendingError::EmptySearchTerm);
        }

        let now = chrono::Utc::now();
        let mut records = self.records.lock();
        let record = records
            .entry(seed.search_term.clone())
            .and_modify(|record| {
                record.count += 1;
                record.updated_at = Some(now);
            })
            .or_insert_with(|| TrendingRecord {
                id: uuid::Uuid::new_v4().simple().to_string(),
                search_term: seed.search_term,
                count: 1,
                movie_id: Some(seed.movie_id),
                poster_url: seed.poster_url,
                created_at: Some(now),
                updated_at: Some(now),
            });

        Ok(record.clone())
    }
}
