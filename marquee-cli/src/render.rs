//! Plain-text rendering for terminal output

use std::fmt::Write;

use marquee_core::TrendingRecord;
use marquee_search::ResultsView;

/// Renders the results area as text: a loading line, else the error
/// message, else one numbered line per movie.
pub fn render_results(view: ResultsView<'_>) -> String {
    match view {
        ResultsView::Loading => "Loading...".to_string(),
        ResultsView::Error(message) => message.to_string(),
        ResultsView::Movies(movies) => {
            let mut out = String::new();
            for (index, movie) in movies.iter().enumerate() {
                let year = movie
                    .release_year()
                    .map(|y| format!(" ({y})"))
                    .unwrap_or_default();
                let rating = movie
                    .vote_average
                    .map(|r| format!("  ★ {r:.1}"))
                    .unwrap_or_default();
                let _ = writeln!(out, "{:>3}. {}{year}{rating}", index + 1, movie.title);
            }
            out.trim_end().to_string()
        }
    }
}

/// Renders the trending list as text, or nothing when it is empty.
pub fn render_trending(records: &[TrendingRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut out = String::from("Trending searches\n");
    for (index, record) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {} ({} searches)",
            index + 1,
            record.search_term,
            record.count
        );
    }
    out.trim_end().to_string()
}
