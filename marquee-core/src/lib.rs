//! Marquee Core - Configuration, movie records and trending analytics
//!
//! This crate holds the pieces every other Marquee crate builds on: the
//! centralized configuration, the movie record passed through from the
//! metadata API, and the trending-search store with its reporter.

pub mod config;
pub mod movie;
pub mod query;
pub mod trending;

// Re-export main types for convenient access
pub use config::MarqueeConfig;
pub use movie::Movie;
pub use query::normalize_query;
pub use trending::{
    AppwriteTrendingStore, InMemoryTrendingStore, RecordOutcome, SearchSeed, TrendingError,
    TrendingRecord, TrendingReporter, TrendingStore,
};

/// Core errors that can bubble up from any Marquee subsystem.
///
/// High-level error types representing failures in core functionality.
#[derive(Debug, thiserror::Error)]
pub enum MarqueeError {
    #[error("Trending error: {0}")]
    Trending(#[from] TrendingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Web server error: {reason}")]
    Server { reason: String },
}

impl MarqueeError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            MarqueeError::Trending(e) => match e {
                TrendingError::NotConfigured { what } => {
                    format!("Trending store is missing {what}")
                }
                _ => "Trending searches are unavailable right now".to_string(),
            },
            MarqueeError::Io(e) => format!("I/O error: {e}"),
            MarqueeError::Server { reason } => format!("Web server error: {reason}"),
        }
    }

    /// Wraps any displayable server failure.
    pub fn from_server_error(error: impl std::fmt::Display) -> Self {
        MarqueeError::Server {
            reason: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MarqueeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_transport_details() {
        let error = MarqueeError::from(TrendingError::RequestFailed {
            reason: "connection refused (os error 111)".to_string(),
        });

        assert_eq!(
            error.user_message(),
            "Trending searches are unavailable right now"
        );
    }

    #[test]
    fn test_user_message_names_missing_setting() {
        let error = MarqueeError::from(TrendingError::NotConfigured {
            what: "valid APPWRITE_ENDPOINT (relative URL without a base)".to_string(),
        });

        assert!(error.user_message().starts_with("Trending store is missing"));
        assert!(error.user_message().contains("APPWRITE_ENDPOINT"));
    }

    #[test]
    fn test_user_message_for_server_failure() {
        let error = MarqueeError::from_server_error("address in use");
        assert_eq!(error.user_message(), "Web server error: address in use");
    }
}
