//! Error types for movie lookups.

use thiserror::Error;

/// Errors that can occur while looking movies up.
#[derive(Debug, Error)]
pub enum MovieLookupError {
    /// The API answered with a non-success status.
    #[error("Lookup failed for query '{query}': {reason}")]
    SearchFailed {
        /// The query that failed, empty for the unscoped listing
        query: String,
        /// The reason for the failure
        reason: String,
    },

    /// Network communication error occurred during the lookup.
    #[error("Network error: {reason}")]
    NetworkError {
        /// The reason for the network error
        reason: String,
    },

    /// The response body could not be decoded.
    #[error("Parse error: {reason}")]
    ParseError {
        /// The reason for the parse error
        reason: String,
    },
}
