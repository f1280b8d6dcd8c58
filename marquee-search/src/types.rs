//! Data types for movie search.

use marquee_core::Movie;
use serde::{Deserialize, Serialize};

/// What to ask the metadata API for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieQuery {
    /// Unscoped listing sorted by popularity.
    Discover,
    /// Free-text title search.
    Search(String),
}

impl MovieQuery {
    /// Builds a query from user text. Blank text means `Discover`.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            MovieQuery::Discover
        } else {
            MovieQuery::Search(trimmed.to_string())
        }
    }

    /// Query text, empty for `Discover`.
    pub fn text(&self) -> &str {
        match self {
            MovieQuery::Discover => "",
            MovieQuery::Search(text) => text,
        }
    }
}

/// User-visible reason a lookup produced no list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFailure {
    /// Transport error or non-success status from the API.
    Transport,
    /// The API answered but returned no movies.
    NoResults,
}

impl SearchFailure {
    /// Message shown in place of the movie list.
    pub fn message(&self) -> &'static str {
        match self {
            SearchFailure::Transport => "Error fetching movies. Please try again later.",
            SearchFailure::NoResults => "No movies found",
        }
    }
}

/// What the results area should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultsView<'a> {
    /// A lookup is outstanding.
    Loading,
    /// The last lookup failed with this message.
    Error(&'static str),
    /// The last lookup's movies, in API order.
    Movies(&'a [Movie]),
}

impl<'a> ResultsView<'a> {
    /// Picks the view: loading first, then error, then the list.
    pub fn classify(loading: bool, error: Option<SearchFailure>, results: &'a [Movie]) -> Self {
        if loading {
            ResultsView::Loading
        } else if let Some(failure) = error {
            ResultsView::Error(failure.message())
        } else {
            ResultsView::Movies(results)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_discover() {
        assert_eq!(MovieQuery::from_text(""), MovieQuery::Discover);
        assert_eq!(MovieQuery::from_text("  \t"), MovieQuery::Discover);
        assert_eq!(
            MovieQuery::from_text(" batman "),
            MovieQuery::Search("batman".to_string())
        );
    }

    #[test]
    fn test_failure_messages_are_distinct() {
        assert_ne!(
            SearchFailure::Transport.message(),
            SearchFailure::NoResults.message()
        );
        assert_eq!(SearchFailure::NoResults.message(), "No movies found");
    }

    #[test]
    fn test_classify_precedence() {
        let movies = vec![Movie::new(1, "Batman")];

        assert_eq!(
            ResultsView::classify(true, Some(SearchFailure::Transport), &movies),
            ResultsView::Loading
        );
        assert_eq!(
            ResultsView::classify(false, Some(SearchFailure::Transport), &movies),
            ResultsView::Error(SearchFailure::Transport.message())
        );
        assert_eq!(
            ResultsView::classify(false, None, &movies),
            ResultsView::Movies(&movies)
        );
    }
}
