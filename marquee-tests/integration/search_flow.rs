//! Lookup and trending pipeline against stub TMDB and Appwrite servers.

use std::collections::HashMap;
use std::time::Duration;

use axum::http::StatusCode;
use marquee_core::{MarqueeConfig, RecordOutcome, TrendingError};
use marquee_search::{Completion, ResultsView, SearchController, SearchFailure, SearchService};
use serde_json::json;

use crate::stubs::{
    AppwriteStub, TmdbReply, TmdbStub, dead_endpoint, spawn_appwrite, spawn_tmdb,
};

fn config(tmdb: &str, appwrite: Option<&str>, token: Option<&str>) -> MarqueeConfig {
    let mut vars = HashMap::new();
    vars.insert("TMDB_BASE_URL", tmdb.to_string());
    if let Some(token) = token {
        vars.insert("TMDB_API_KEY", token.to_string());
    }
    if let Some(endpoint) = appwrite {
        vars.insert("APPWRITE_ENDPOINT", endpoint.to_string());
        vars.insert("APPWRITE_PROJECT_ID", "marquee".to_string());
        vars.insert("APPWRITE_API_KEY", "secret".to_string());
        vars.insert("APPWRITE_DATABASE_ID", "db".to_string());
        vars.insert("APPWRITE_COLLECTION_ID", "metrics".to_string());
    }
    MarqueeConfig::from_lookup(|key| vars.get(key).cloned())
}

fn batman_body() -> serde_json::Value {
    json!({
        "page": 1,
        "results": [
            { "id": 1, "title": "Batman", "poster_path": "/p.jpg", "vote_average": 7.2 }
        ]
    })
}

#[tokio::test]
async fn test_batman_search_records_trending() {
    let tmdb = TmdbStub::default().reply("batman", TmdbReply::Body(batman_body()));
    let requests = tmdb.requests.clone();
    let appwrite = AppwriteStub::default();
    let config = config(
        &spawn_tmdb(tmdb).await,
        Some(&spawn_appwrite(appwrite.clone()).await),
        Some("token-123"),
    );

    let controller = SearchController::new(SearchService::from_config(&config).unwrap());
    let settled = controller.search("batman").await;

    assert_eq!(settled.completion, Completion::Applied);
    assert!(settled.outcome.record.is_recorded());

    let state = controller.snapshot().await;
    assert!(!state.is_loading());
    assert_eq!(state.error_message(), None);
    assert_eq!(state.results().len(), 1);
    assert_eq!(state.results()[0].title, "Batman");

    let document = appwrite.document("batman").unwrap();
    assert_eq!(document["count"], 1);
    assert_eq!(document["movie_id"], 1);
    assert_eq!(document["poster_url"], "https://image.tmdb.org/t/p/w500/p.jpg");

    let requests = requests.lock();
    assert_eq!(requests[0].0, "batman");
    assert_eq!(requests[0].1.as_deref(), Some("Bearer token-123"));
}

#[tokio::test]
async fn test_repeat_search_increments_count() {
    // Lookups keep the user's casing; only the trending key is normalized
    let tmdb = TmdbStub::default()
        .reply("batman", TmdbReply::Body(batman_body()))
        .reply("Batman", TmdbReply::Body(batman_body()));
    let requests = tmdb.requests.clone();
    let appwrite = AppwriteStub::default();
    let config = config(
        &spawn_tmdb(tmdb).await,
        Some(&spawn_appwrite(appwrite.clone()).await),
        Some("token"),
    );
    let service = SearchService::from_config(&config).unwrap();

    service.run("batman").await;
    service.run("  Batman ").await;
    service.run("batman").await;

    let sent: Vec<String> = requests.lock().iter().map(|(query, _)| query.clone()).collect();
    assert_eq!(sent, ["batman", "Batman", "batman"]);

    assert_eq!(appwrite.documents.lock().len(), 1);
    assert_eq!(appwrite.document("batman").unwrap()["count"], 3);

    let trending = service.reporter().load_trending().await.unwrap();
    assert_eq!(trending.len(), 1);
    assert_eq!(trending[0].search_term, "batman");
    assert_eq!(trending[0].count, 3);
}

#[tokio::test]
async fn test_trending_is_ordered_and_limited() {
    let tmdb = TmdbStub::default();
    let appwrite = AppwriteStub::default();
    for (term, count) in [("alien", 2), ("batman", 9), ("cars", 4), ("dune", 7)] {
        appwrite.documents.lock().push(json!({
            "$id": term,
            "searchTerm": term,
            "count": count,
            "movie_id": 1,
            "poster_url": format!("https://image.tmdb.org/t/p/w500/{term}.jpg"),
        }));
    }
    let mut config = config(
        &spawn_tmdb(tmdb).await,
        Some(&spawn_appwrite(appwrite).await),
        None,
    );
    config.trending.limit = 3;

    let service = SearchService::from_config(&config).unwrap();
    let trending = service.reporter().load_trending().await.unwrap();
    let terms: Vec<&str> = trending.iter().map(|r| r.search_term.as_str()).collect();

    assert_eq!(terms, ["batman", "dune", "cars"]);
}

#[tokio::test]
async fn test_empty_query_with_no_results() {
    let tmdb = TmdbStub::default().reply("", TmdbReply::Body(json!({ "results": [] })));
    let appwrite = AppwriteStub::default();
    let config = config(
        &spawn_tmdb(tmdb).await,
        Some(&spawn_appwrite(appwrite.clone()).await),
        Some("token"),
    );

    let outcome = SearchService::from_config(&config).unwrap().run("").await;

    assert_eq!(outcome.result, Err(SearchFailure::NoResults));
    assert!(matches!(outcome.view(), ResultsView::Error("No movies found")));
    assert!(matches!(outcome.record, RecordOutcome::Skipped));
    assert!(appwrite.documents.lock().is_empty());
}

#[tokio::test]
async fn test_missing_results_field_is_no_movies() {
    let tmdb = TmdbStub::default().reply("zzz", TmdbReply::Body(json!({ "page": 1 })));
    let config = config(&spawn_tmdb(tmdb).await, None, Some("token"));

    let outcome = SearchService::from_config(&config).unwrap().run("zzz").await;

    assert_eq!(outcome.result, Err(SearchFailure::NoResults));
}

#[tokio::test]
async fn test_odd_movie_records_do_not_fail_search() {
    let tmdb = TmdbStub::default().reply(
        "batman",
        TmdbReply::Body(json!({
            "results": [
                { "id": 1, "title": "Batman", "poster_path": "/p.jpg" },
                { "id": 2, "title": null, "poster_path": null }
            ]
        })),
    );
    let config = config(&spawn_tmdb(tmdb).await, None, Some("token"));

    let outcome = SearchService::from_config(&config).unwrap().run("batman").await;

    assert_eq!(outcome.movies().len(), 2);
    assert_eq!(outcome.movies()[1].title, "");
    assert!(outcome.record.is_recorded());
}

#[tokio::test]
async fn test_rejected_request_shows_generic_error() {
    let tmdb = TmdbStub::default().reply("batman", TmdbReply::Status(StatusCode::UNAUTHORIZED));
    let requests = tmdb.requests.clone();
    let config = config(&spawn_tmdb(tmdb).await, None, None);

    let controller = SearchController::new(SearchService::from_config(&config).unwrap());
    let settled = controller.search("batman").await;

    assert_eq!(settled.outcome.result, Err(SearchFailure::Transport));
    assert!(matches!(settled.outcome.record, RecordOutcome::Skipped));

    let state = controller.snapshot().await;
    assert!(!state.is_loading());
    assert!(state.results().is_empty());
    assert_eq!(
        state.error_message(),
        Some("Error fetching movies. Please try again later.")
    );
    assert_eq!(requests.lock()[0].1, None);
}

#[tokio::test]
async fn test_unreachable_tmdb_shows_generic_error() {
    let config = config(&dead_endpoint().await, None, Some("token"));

    let controller = SearchController::new(SearchService::from_config(&config).unwrap());
    controller.search("batman").await;

    let state = controller.snapshot().await;
    assert!(!state.is_loading());
    assert_eq!(state.error(), Some(SearchFailure::Transport));
}

#[tokio::test]
async fn test_store_outage_does_not_affect_results() {
    let tmdb = TmdbStub::default().reply("batman", TmdbReply::Body(batman_body()));
    let config = config(
        &spawn_tmdb(tmdb).await,
        Some(&dead_endpoint().await),
        Some("token"),
    );

    let controller = SearchController::new(SearchService::from_config(&config).unwrap());
    let settled = controller.search("batman").await;

    assert_eq!(settled.completion, Completion::Applied);
    assert!(matches!(
        settled.outcome.record,
        RecordOutcome::Failed(TrendingError::RequestFailed { .. })
    ));
    assert_eq!(controller.snapshot().await.results().len(), 1);

    assert!(controller.load_trending().await.is_empty());
    assert!(controller.snapshot().await.trending().is_empty());
}

#[tokio::test]
async fn test_slow_earlier_response_is_discarded() {
    let tmdb = TmdbStub::default()
        .reply(
            "bat",
            TmdbReply::Delayed(
                Duration::from_millis(300),
                json!({ "results": [{ "id": 9, "title": "Bat Thing" }] }),
            ),
        )
        .reply("batman", TmdbReply::Body(batman_body()));
    let appwrite = AppwriteStub::default();
    let config = config(
        &spawn_tmdb(tmdb).await,
        Some(&spawn_appwrite(appwrite.clone()).await),
        Some("token"),
    );
    let controller = SearchController::new(SearchService::from_config(&config).unwrap());

    let slow = tokio::spawn({
        let controller = controller.clone();
        async move { controller.search("bat").await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    let fast = controller.search("batman").await;
    let slow = slow.await.unwrap();

    assert_eq!(fast.completion, Completion::Applied);
    assert_eq!(slow.completion, Completion::Stale);

    let state = controller.snapshot().await;
    assert_eq!(state.query(), "batman");
    assert_eq!(state.results()[0].title, "Batman");
    assert!(!state.is_loading());

    // Both lookups succeeded, so both are counted.
    assert!(appwrite.document("bat").is_some());
    assert!(appwrite.document("batman").is_some());
}
