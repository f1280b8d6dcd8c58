//! Search pipeline: lookup, classify, report.

use std::sync::Arc;

use marquee_core::{MarqueeConfig, MarqueeError, Movie, RecordOutcome, TrendingReporter};
use tracing::error;

use crate::providers::{DemoProvider, MovieLookupProvider, TmdbProvider};
use crate::types::{MovieQuery, ResultsView, SearchFailure};

/// Result of one search run through the pipeline.
#[derive(Debug)]
pub struct SearchOutcome {
    /// Query text as given by the user.
    pub query: String,
    /// Movies on success, or the failure shown instead of them.
    pub result: Result<Vec<Movie>, SearchFailure>,
    /// What happened to the trending update.
    pub record: RecordOutcome,
}

impl SearchOutcome {
    /// Resolved view for this outcome.
    pub fn view(&self) -> ResultsView<'_> {
        match self.result {
            Ok(ref movies) => ResultsView::Movies(movies),
            Err(failure) => ResultsView::Error(failure.message()),
        }
    }

    /// Movies returned, empty on failure.
    pub fn movies(&self) -> &[Movie] {
        self.result.as_deref().unwrap_or_default()
    }
}

/// Movie search service combining a lookup provider with trending reporting.
#[derive(Debug, Clone)]
pub struct SearchService {
    provider: Arc<dyn MovieLookupProvider>,
    reporter: TrendingReporter,
}

impl SearchService {
    /// Creates a service over an explicit provider and reporter.
    pub fn new(provider: Arc<dyn MovieLookupProvider>, reporter: TrendingReporter) -> Self {
        Self { provider, reporter }
    }

    /// Creates the production service: TMDB lookups and the configured
    /// trending store.
    ///
    /// # Errors
    /// - `MarqueeError::Trending` - Trending store settings are malformed
    pub fn from_config(config: &MarqueeConfig) -> Result<Self, MarqueeError> {
        let reporter = TrendingReporter::from_config(config)?;
        Ok(Self::new(
            Arc::new(TmdbProvider::from_config(&config.tmdb)),
            reporter,
        ))
    }

    /// Creates a service with demo movie data for development.
    ///
    /// # Errors
    /// - `MarqueeError::Trending` - Trending store settings are malformed
    pub fn new_demo(config: &MarqueeConfig) -> Result<Self, MarqueeError> {
        let reporter = TrendingReporter::from_config(config)?;
        Ok(Self::new(Arc::new(DemoProvider::new()), reporter))
    }

    /// Trending reporter used by this service.
    pub fn reporter(&self) -> &TrendingReporter {
        &self.reporter
    }

    /// Looks movies up for `query` and classifies the answer.
    ///
    /// Provider errors are logged and become `SearchFailure::Transport`; an
    /// empty answer becomes `SearchFailure::NoResults`.
    pub async fn lookup(&self, query: &str) -> Result<Vec<Movie>, SearchFailure> {
        let movie_query = MovieQuery::from_text(query);

        match self.provider.lookup(&movie_query).await {
            Ok(movies) if movies.is_empty() => Err(SearchFailure::NoResults),
            Ok(movies) => Ok(movies),
            Err(e) => {
                error!(query = movie_query.text(), error = %e, "error fetching movies");
                Err(SearchFailure::Transport)
            }
        }
    }

    /// Reports a finished lookup to the trending store.
    ///
    /// Only a successful, non-empty search for non-blank text is recorded,
    /// with its first result.
    pub async fn report(
        &self,
        query: &str,
        result: &Result<Vec<Movie>, SearchFailure>,
    ) -> RecordOutcome {
        match (MovieQuery::from_text(query), result) {
            (MovieQuery::Search(text), Ok(movies)) => match movies.first() {
                Some(top) => self.reporter.record_search(&text, top).await,
                None => RecordOutcome::Skipped,
            },
            _ => RecordOutcome::Skipped,
        }
    }

    /// Runs the full pipeline for one query.
    pub async fn run(&self, query: &str) -> SearchOutcome {
        let result = self.lookup(query).await;
        let record = self.report(query, &result).await;

        SearchOutcome {
            query: query.to_string(),
            result,
            record,
        }
    }
}

#[cfg(test)]
mod tests {
    use marquee_core::{InMemoryTrendingStore, TrendingStore};

    use super::*;
    use crate::providers::MockProvider;

    fn service(provider: MockProvider) -> (SearchService, Arc<InMemoryTrendingStore>) {
        let store = Arc::new(InMemoryTrendingStore::new());
        let reporter = TrendingReporter::new(store.clone(), "https://image.tmdb.org/t/p/w500", 5);
        (SearchService::new(Arc::new(provider), reporter), store)
    }

    #[tokio::test]
    async fn test_batman_records_first_result() {
        let provider = MockProvider::new().with_movies(
            "batman",
            vec![
                Movie::new(1, "Batman").with_poster("/p.jpg"),
                Movie::new(2, "Batman Returns").with_poster("/q.jpg"),
            ],
        );
        let (service, store) = service(provider);

        let outcome = service.run("batman").await;

        assert_eq!(outcome.movies().len(), 2);
        assert_eq!(outcome.movies()[0].title, "Batman");
        assert!(outcome.record.is_recorded());
        let record = store.get("batman").unwrap();
        assert_eq!(record.count, 1);
        assert_eq!(record.movie_id, Some(1));
        assert!(record.poster_url.unwrap().ends_with("/p.jpg"));
    }

    #[tokio::test]
    async fn test_empty_query_never_records() {
        let provider = MockProvider::new().with_movies("", vec![Movie::new(1, "Popular")]);
        let (service, store) = service(provider);

        let outcome = service.run("").await;

        assert_eq!(outcome.movies().len(), 1);
        assert!(matches!(outcome.record, RecordOutcome::Skipped));
        assert!(store.top(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_results_is_no_results() {
        let (service, store) = service(MockProvider::new());

        let outcome = service.run("").await;

        assert_eq!(outcome.result, Err(SearchFailure::NoResults));
        assert_eq!(outcome.view(), ResultsView::Error("No movies found"));
        assert!(outcome.movies().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_network_error_is_transport_failure() {
        let (service, store) = service(MockProvider::new().with_failure("batman"));

        let outcome = service.run("batman").await;

        assert_eq!(outcome.result, Err(SearchFailure::Transport));
        assert_eq!(
            outcome.view(),
            ResultsView::Error("Error fetching movies. Please try again later.")
        );
        assert!(matches!(outcome.record, RecordOutcome::Skipped));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_each_run_issues_one_lookup() {
        let provider = Arc::new(MockProvider::new());
        let store = Arc::new(InMemoryTrendingStore::new());
        let service = SearchService::new(
            provider.clone(),
            TrendingReporter::new(store, "https://image.tmdb.org/t/p/w500", 5),
        );

        service.run("alien").await;
        service.run("").await;

        assert_eq!(
            provider.calls(),
            vec![MovieQuery::Search("alien".to_string()), MovieQuery::Discover]
        );
    }
}
