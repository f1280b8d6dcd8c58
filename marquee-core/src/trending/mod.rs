//! Trending search analytics.
//!
//! Every successful non-empty search bumps a per-query counter in a document
//! store; the top counters form the "trending" list shown on load.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod appwrite;
pub mod memory;
pub mod reporter;

pub use appwrite::AppwriteTrendingStore;
pub use memory::InMemoryTrendingStore;
pub use reporter::{RecordOutcome, TrendingReporter};

/// One stored search term with its hit counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingRecord {
    /// Store-assigned document identifier
    #[serde(rename = "$id")]
    pub id: String,
    /// Normalized query text this record counts
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    /// Number of successful searches for the term
    pub count: u64,
    /// Top result's movie id when the record was created
    #[serde(default)]
    pub movie_id: Option<u64>,
    /// Top result's poster URL when the record was created
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Data needed to create a record for a term seen for the first time.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSeed {
    pub search_term: String,
    pub movie_id: u64,
    pub poster_url: Option<String>,
}

/// Errors from the trending store.
#[derive(Debug, Error)]
pub enum TrendingError {
    /// The store could not be reached.
    #[error("Trending store request failed: {reason}")]
    RequestFailed { reason: String },

    /// The store answered with a non-success status.
    #[error("Trending store returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The store's response body could not be decoded.
    #[error("Trending store response could not be parsed: {reason}")]
    ParseError { reason: String },

    /// A required setting for the store is missing or malformed.
    #[error("Trending store not configured: {what}")]
    NotConfigured { what: String },

    /// Records are keyed by search term, which may not be empty.
    #[error("Search term is empty")]
    EmptySearchTerm,
}

/// Document store holding trending records.
///
/// Implementations serialize their own writes; callers do not coordinate
/// concurrent increments.
#[async_trait]
pub trait TrendingStore: Send + Sync + std::fmt::Debug {
    /// Returns up to `limit` records ordered by count, highest first.
    ///
    /// # Errors
    /// - `TrendingError::RequestFailed` - Store unreachable
    /// - `TrendingError::UnexpectedStatus` - Store rejected the read
    /// - `TrendingError::ParseError` - Malformed response
    async fn top(&self, limit: usize) -> Result<Vec<TrendingRecord>, TrendingError>;

    /// Increments the record for `seed.search_term`, creating it with
    /// count 1 when absent. Returns the record after the write.
    ///
    /// # Errors
    /// - `TrendingError::EmptySearchTerm` - Seed has no search term
    /// - `TrendingError::RequestFailed` - Store unreachable
    /// - `TrendingError::UnexpectedStatus` - Store rejected the read or write
    /// - `TrendingError::ParseError` - Malformed response
    async fn upsert(&self, seed: SearchSeed) -> Result<TrendingRecord, TrendingError>;
}
