//! Provider implementations for movie lookups.

use async_trait::async_trait;
use marquee_core::Movie;

use crate::errors::MovieLookupError;
use crate::types::MovieQuery;

pub mod demo;
pub mod mock;
pub mod tmdb;

pub use demo::DemoProvider;
pub use mock::MockProvider;
pub use tmdb::TmdbProvider;

/// Trait for movie lookup providers.
///
/// Implementations fetch movies through different backends (the TMDB API,
/// a canned demo catalog, scripted mocks for testing). An empty list is a
/// successful answer, not an error.
#[async_trait]
pub trait MovieLookupProvider: Send + Sync + std::fmt::Debug {
    /// Looks up movies for the query, in the order the backend returns them.
    ///
    /// # Errors
    /// - `MovieLookupError::NetworkError` - Backend unreachable
    /// - `MovieLookupError::SearchFailed` - Backend answered with a failure status
    /// - `MovieLookupError::ParseError` - Backend response could not be decoded
    async fn lookup(&self, query: &MovieQuery) -> Result<Vec<Movie>, MovieLookupError>;
}
