//! Discovery page - search box, trending list, all movies

use axum::extract::State;
use axum::response::Html;
use tracing::warn;

use crate::components::{layout, render_page, search_input, spinner, trending_section};
use crate::server::AppState;

/// Renders the discovery page.
///
/// The trending list is read while rendering; if the store fails the
/// section is left empty. The movie section starts in its loading state and
/// fetches the unscoped listing as soon as the page loads.
pub async fn home_page(State(state): State<AppState>) -> Html<String> {
    let trending = match state.search.reporter().load_trending().await {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "error loading trending movies");
            Vec::new()
        }
    };

    let all_movies = format!(
        r#"<div id="all-movies" hx-get="/htmx/movies?query=" hx-trigger="load">{}</div>"#,
        spinner()
    );

    let content = format!(
        r#"{}
        {}
        {}"#,
        layout::hero_header(&search_input("", state.debounce.as_millis())),
        trending_section(&trending),
        layout::section("all-movies", "All Movies", &all_movies)
    );

    render_page("Discover", &content)
}
