//! HTMX handlers for partial updates
//!
//! Return HTML fragments swapped into the discovery page.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse};
use serde::Deserialize;
use tracing::warn;

use crate::components::{results_section, trending_section};
use crate::server::AppState;

/// Query string for movie lookups.
#[derive(Debug, Default, Deserialize)]
pub struct MoviesQuery {
    /// Search text; empty for the unscoped listing
    #[serde(default)]
    pub query: String,
}

/// Renders the results area for a query.
///
/// When the search was counted as trending the response carries an
/// `HX-Trigger: trending-updated` header so the page refreshes its
/// trending section.
pub async fn movies_fragment(
    State(state): State<AppState>,
    Query(params): Query<MoviesQuery>,
) -> impl IntoResponse {
    let outcome = state.search.run(&params.query).await;

    let mut headers = HeaderMap::new();
    if outcome.record.is_recorded() {
        headers.insert("hx-trigger", HeaderValue::from_static("trending-updated"));
    }

    (
        headers,
        Html(results_section(outcome.view(), &state.image_base_url)),
    )
}

/// Renders the trending section.
pub async fn trending_fragment(State(state): State<AppState>) -> Html<String> {
    let records = match state.search.reporter().load_trending().await {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "error loading trending movies");
            Vec::new()
        }
    };

    Html(trending_section(&records))
}
