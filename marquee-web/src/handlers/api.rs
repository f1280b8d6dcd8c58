//! JSON API handlers

use axum::Json;
use axum::extract::{Query, State};
use serde_json::json;
use tracing::warn;

use crate::htmx::MoviesQuery;
use crate::server::AppState;

/// Looks movies up and returns `{query, results, error}`.
///
/// `error` is null on success and holds the user-facing message otherwise.
pub async fn api_movies(
    State(state): State<AppState>,
    Query(params): Query<MoviesQuery>,
) -> Json<serde_json::Value> {
    let outcome = state.search.run(&params.query).await;
    let error = outcome.result.as_ref().err().map(|failure| failure.message());

    Json(json!({
        "query": outcome.query,
        "results": outcome.movies(),
        "error": error,
    }))
}

/// Returns the trending records in store order.
///
/// Store failures are logged and answered with an empty list.
pub async fn api_trending(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.search.reporter().load_trending().await {
        Ok(records) => Json(json!(records)),
        Err(e) => {
            warn!(error = %e, "error loading trending movies");
            Json(json!([]))
        }
    }
}
