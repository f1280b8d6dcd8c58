//! Scripted provider for tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use marquee_core::Movie;
use parking_lot::Mutex;

use super::MovieLookupProvider;
use crate::errors::MovieLookupError;
use crate::types::MovieQuery;

#[derive(Debug, Clone)]
enum MockResponse {
    Movies(Vec<Movie>, Duration),
    Failure,
}

/// Provider answering from a script keyed by query text.
///
/// Unscripted queries answer with an empty list. Every call is logged so
/// tests can assert how many lookups were issued.
#[derive(Debug, Default)]
pub struct MockProvider {
    responses: Mutex<HashMap<String, MockResponse>>,
    calls: Mutex<Vec<MovieQuery>>,
}

impl MockProvider {
    /// Creates a provider with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `query` with `movies`. Use `""` for the unscoped listing.
    pub fn with_movies(self, query: &str, movies: Vec<Movie>) -> Self {
        self.with_delayed_movies(query, movies, Duration::ZERO)
    }

    /// Answers `query` with `movies` after `delay`.
    pub fn with_delayed_movies(self, query: &str, movies: Vec<Movie>, delay: Duration) -> Self {
        self.responses
            .lock()
            .insert(query.to_string(), MockResponse::Movies(movies, delay));
        self
    }

    /// Answers `query` with a network error.
    pub fn with_failure(self, query: &str) -> Self {
        self.responses
            .lock()
            .insert(query.to_string(), MockResponse::Failure);
        self
    }

    /// Queries looked up so far, in call order.
    pub fn calls(&self) -> Vec<MovieQuery> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl MovieLookupProvider for MockProvider {
    async fn lookup(&self, query: &MovieQuery) -> Result<Vec<Movie>, MovieLookupError> {
        self.calls.lock().push(query.clone());
        let response = self.responses.lock().get(query.text()).cloned();

        match response {
            Some(MockResponse::Movies(movies, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(movies)
            }
            Some(MockResponse::Failure) => Err(MovieLookupError::NetworkError {
                reason: "mock network failure".to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}
