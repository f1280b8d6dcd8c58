//! The web surface served over real HTTP, backed by stub services.

use std::collections::HashMap;

use marquee_core::MarqueeConfig;
use marquee_search::SearchService;
use marquee_web::{AppState, router};
use serde_json::{Value, json};

use crate::stubs::{AppwriteStub, TmdbReply, TmdbStub, serve, spawn_appwrite, spawn_tmdb};

async fn start_app(tmdb: TmdbStub, appwrite: AppwriteStub) -> String {
    let tmdb_url = spawn_tmdb(tmdb).await;
    let appwrite_url = spawn_appwrite(appwrite).await;
    let vars: HashMap<&str, String> = HashMap::from([
        ("TMDB_BASE_URL", tmdb_url),
        ("TMDB_API_KEY", "token".to_string()),
        ("APPWRITE_ENDPOINT", appwrite_url),
        ("APPWRITE_PROJECT_ID", "marquee".to_string()),
        ("APPWRITE_DATABASE_ID", "db".to_string()),
        ("APPWRITE_COLLECTION_ID", "metrics".to_string()),
        ("MARQUEE_DEBOUNCE_MS", "250".to_string()),
    ]);
    let config = MarqueeConfig::from_lookup(|key| vars.get(key).cloned());

    let search = SearchService::from_config(&config).unwrap();
    serve(router(AppState::new(search, &config))).await
}

fn movies_body() -> Value {
    json!({
        "results": [
            { "id": 1, "title": "Batman", "poster_path": "/p.jpg", "release_date": "1989-06-21" },
            { "id": 2, "title": "Batman Returns", "poster_path": null }
        ]
    })
}

#[tokio::test]
async fn test_home_page_shell() {
    let base = start_app(TmdbStub::default(), AppwriteStub::default()).await;
    let response = reqwest::get(format!("{base}/")).await.unwrap();

    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("delay:250ms"));
    assert!(body.contains(r#"id="all-movies""#));
}

#[tokio::test]
async fn test_search_fragment_and_trending_refresh() {
    let tmdb = TmdbStub::default().reply("batman", TmdbReply::Body(movies_body()));
    let appwrite = AppwriteStub::default();
    let base = start_app(tmdb, appwrite.clone()).await;

    let response = reqwest::get(format!("{base}/htmx/movies?query=batman"))
        .await
        .unwrap();
    assert_eq!(
        response.headers().get("hx-trigger").unwrap(),
        "trending-updated"
    );
    let fragment = response.text().await.unwrap();
    assert_eq!(fragment.matches("movie-card").count(), 2);
    assert!(fragment.contains("1989"));
    assert!(fragment.contains("No poster"));

    assert_eq!(appwrite.document("batman").unwrap()["count"], 1);

    let trending = reqwest::get(format!("{base}/htmx/trending"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(trending.contains("Trending Movies"));
    assert!(trending.contains("https://image.tmdb.org/t/p/w500/p.jpg"));
}

#[tokio::test]
async fn test_api_reports_errors_as_json() {
    let tmdb = TmdbStub::default().reply(
        "batman",
        TmdbReply::Status(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    );
    let base = start_app(tmdb, AppwriteStub::default()).await;

    let failed: Value = reqwest::get(format!("{base}/api/movies?query=batman"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        failed["error"],
        "Error fetching movies. Please try again later."
    );

    let empty: Value = reqwest::get(format!("{base}/api/movies?query=nothing"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(empty["error"], "No movies found");
    assert_eq!(empty["results"], json!([]));

    let trending: Value = reqwest::get(format!("{base}/api/trending"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(trending, json!([]));
}
