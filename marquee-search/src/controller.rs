//! Search state owned by a single controller.
//!
//! Every lookup is tagged with a sequence number when it starts. When it
//! finishes, its result is applied only if no newer lookup has started
//! since; otherwise it is dropped. This keeps a slow response for an old
//! query from overwriting the results of a newer one.

use std::sync::Arc;

use marquee_core::{Movie, TrendingRecord};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::service::{SearchOutcome, SearchService};
use crate::types::{ResultsView, SearchFailure};

/// Handle for an issued lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    sequence: u64,
    query: String,
}

impl RequestTicket {
    /// Sequence number assigned when the lookup started.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Query text the lookup was issued for.
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Whether a finished lookup changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The lookup was the latest one and its result is now shown.
    Applied,
    /// A newer lookup had started; the result was discarded.
    Stale,
}

/// Everything the UI shows, updated only through the transition methods.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    results: Vec<Movie>,
    loading: bool,
    error: Option<SearchFailure>,
    trending: Vec<TrendingRecord>,
    latest: u64,
}

impl SearchState {
    /// Starts a lookup for `query`: stores the text, raises the loading
    /// flag, clears the error and issues a new ticket.
    pub fn begin(&mut self, query: &str) -> RequestTicket {
        self.latest += 1;
        self.query = query.to_string();
        self.loading = true;
        self.error = None;

        RequestTicket {
            sequence: self.latest,
            query: self.query.clone(),
        }
    }

    /// Finishes the lookup behind `ticket`.
    ///
    /// A stale ticket leaves the state untouched. Otherwise the loading flag
    /// drops and either the results or the failure replace the previous
    /// signal; a failure clears the results.
    pub fn complete(
        &mut self,
        ticket: &RequestTicket,
        result: Result<Vec<Movie>, SearchFailure>,
    ) -> Completion {
        if ticket.sequence != self.latest {
            return Completion::Stale;
        }

        self.loading = false;
        match result {
            Ok(movies) => {
                self.results = movies;
                self.error = None;
            }
            Err(failure) => {
                self.results.clear();
                self.error = Some(failure);
            }
        }

        Completion::Applied
    }

    /// Replaces the trending list, kept in store order.
    pub fn set_trending(&mut self, records: Vec<TrendingRecord>) {
        self.trending = records;
    }

    /// Current query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Results of the last applied lookup.
    pub fn results(&self) -> &[Movie] {
        &self.results
    }

    /// True while the latest lookup is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Failure of the last applied lookup, if any.
    pub fn error(&self) -> Option<SearchFailure> {
        self.error
    }

    /// Message for the last failure, if any.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.map(|failure| failure.message())
    }

    /// Trending list.
    pub fn trending(&self) -> &[TrendingRecord] {
        &self.trending
    }

    /// Sequence number of the most recently issued lookup.
    pub fn latest_sequence(&self) -> u64 {
        self.latest
    }

    /// What the results area should show.
    pub fn view(&self) -> ResultsView<'_> {
        ResultsView::classify(self.loading, self.error, &self.results)
    }
}

/// A lookup that has run through the controller.
#[derive(Debug)]
pub struct SearchSettled {
    /// Whether the state took this lookup's result.
    pub completion: Completion,
    /// The pipeline outcome, including the trending update.
    pub outcome: SearchOutcome,
}

/// Owns the search state and drives lookups through the search service.
///
/// Cheap to clone; clones share the same state. The state lock is never
/// held across a network call.
#[derive(Debug, Clone)]
pub struct SearchController {
    service: SearchService,
    state: Arc<RwLock<SearchState>>,
}

impl SearchController {
    /// Creates a controller with empty state.
    pub fn new(service: SearchService) -> Self {
        Self {
            service,
            state: Arc::new(RwLock::new(SearchState::default())),
        }
    }

    /// Search service behind this controller.
    pub fn service(&self) -> &SearchService {
        &self.service
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> SearchState {
        self.state.read().await.clone()
    }

    /// Looks `query` up and applies the result unless a newer lookup has
    /// started meanwhile.
    ///
    /// The trending update runs after the state settles and its outcome is
    /// only reported back, never applied to the state.
    pub async fn search(&self, query: &str) -> SearchSettled {
        let ticket = self.state.write().await.begin(query);
        debug!(sequence = ticket.sequence, query, "lookup started");

        let result = self.service.lookup(query).await;

        let completion = self.state.write().await.complete(&ticket, result.clone());
        if completion == Completion::Stale {
            debug!(sequence = ticket.sequence, query, "discarding stale lookup result");
        }

        let record = self.service.report(query, &result).await;

        SearchSettled {
            completion,
            outcome: SearchOutcome {
                query: query.to_string(),
                result,
                record,
            },
        }
    }

    /// Loads the trending list into the state.
    ///
    /// A store failure is logged and leaves the list empty.
    pub async fn load_trending(&self) -> Vec<TrendingRecord> {
        let records = match self.service.reporter().load_trending().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "error loading trending movies");
                Vec::new()
            }
        };

        self.state.write().await.set_trending(records.clone());
        records
    }
}
