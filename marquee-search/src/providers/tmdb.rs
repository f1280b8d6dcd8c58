//! TMDB movie lookup provider for production use.

use async_trait::async_trait;
use marquee_core::Movie;
use marquee_core::config::TmdbConfig;
use serde_json::Value;
use tracing::debug;

use super::MovieLookupProvider;
use crate::errors::MovieLookupError;
use crate::types::MovieQuery;

/// Lookup provider for The Movie Database v3 API.
///
/// Sends the bearer token when one is configured. Without it requests still
/// go out and the API rejects them with a non-success status.
#[derive(Debug, Clone)]
pub struct TmdbProvider {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl TmdbProvider {
    /// Creates a provider for the given base URL and token.
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    /// Creates a provider from the TMDB section of the configuration.
    pub fn from_config(config: &TmdbConfig) -> Self {
        Self::new(config.base_url.clone(), config.api_token.clone())
    }

    /// Full request URL for a query.
    pub fn endpoint(&self, query: &MovieQuery) -> String {
        match query {
            MovieQuery::Discover => {
                format!("{}/discover/movie?sort_by=popularity.desc", self.base_url)
            }
            MovieQuery::Search(text) => format!(
                "{}/search/movie?query={}",
                self.base_url,
                urlencoding::encode(text)
            ),
        }
    }

    /// Pulls the `results` array out of a response body.
    ///
    /// A missing or non-array `results` field yields an empty list. Entries
    /// that are not movie objects are skipped.
    fn parse_results(body: Value) -> Vec<Movie> {
        let results = match body {
            Value::Object(mut fields) => match fields.remove("results") {
                Some(Value::Array(results)) => results,
                _ => return Vec::new(),
            },
            _ => return Vec::new(),
        };

        results
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Movie>(entry) {
                Ok(movie) => Some(movie),
                Err(e) => {
                    debug!(error = %e, "skipping malformed TMDB movie record");
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl MovieLookupProvider for TmdbProvider {
    async fn lookup(&self, query: &MovieQuery) -> Result<Vec<Movie>, MovieLookupError> {
        let url = self.endpoint(query);
        debug!(%url, "requesting movies");

        let mut request = self
            .client
            .get(&url)
            .header("accept", "application/json");
        if let Some(ref token) = self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MovieLookupError::NetworkError {
                reason: format!("TMDB request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(MovieLookupError::SearchFailed {
                query: query.text().to_string(),
                reason: format!("TMDB HTTP {}", response.status()),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| MovieLookupError::ParseError {
                reason: format!("TMDB JSON parsing failed: {e}"),
            })?;

        Ok(Self::parse_results(body))
    }
}
