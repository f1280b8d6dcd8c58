//! Marquee Search - Movie lookup and search state

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Looks movies up against the metadata API, classifies the outcome for
//! display, records successful searches as trending, and keeps the search
//! state behind a single controller that discards stale responses.

pub mod controller;
pub mod debounce;
pub mod errors;
pub mod providers;
pub mod service;
pub mod types;

// Re-export main types
pub use controller::{Completion, RequestTicket, SearchController, SearchSettled, SearchState};
pub use debounce::QueryDebouncer;
pub use errors::MovieLookupError;
pub use providers::{DemoProvider, MockProvider, MovieLookupProvider, TmdbProvider};
pub use service::{SearchOutcome, SearchService};
pub use types::{MovieQuery, ResultsView, SearchFailure};

/// Convenience type alias for Results with MovieLookupError.
pub type Result<T> = std::result::Result<T, MovieLookupError>;
