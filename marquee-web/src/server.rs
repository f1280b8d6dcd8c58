//! HTMX + Tailwind web server for Marquee
//!
//! Serves the discovery page, HTMX partial updates and JSON API endpoints.

use std::time::Duration;

use axum::Router;
use axum::routing::get;
use marquee_core::{MarqueeConfig, MarqueeError};
use marquee_search::SearchService;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::handlers::{api_movies, api_trending};
use crate::htmx::{movies_fragment, trending_fragment};
use crate::pages::home_page;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Lookup and trending pipeline
    pub search: SearchService,
    /// Prefix for poster image URLs
    pub image_base_url: String,
    /// Quiet period the search box waits before sending a query
    pub debounce: Duration,
}

impl AppState {
    /// Creates state for the given service using the configured image base
    /// and debounce delay.
    pub fn new(search: SearchService, config: &MarqueeConfig) -> Self {
        Self {
            search,
            image_base_url: config.tmdb.image_base_url.clone(),
            debounce: config.search.debounce,
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Main page
        .route("/", get(home_page))
        // HTMX partial update endpoints
        .route("/htmx/movies", get(movies_fragment))
        .route("/htmx/trending", get(trending_fragment))
        // JSON API endpoints (for external clients)
        .route("/api/movies", get(api_movies))
        .route("/api/trending", get(api_trending))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the web server until it fails.
///
/// Uses the demo catalog instead of TMDB when `demo` is set.
///
/// # Errors
/// - `MarqueeError::Trending` - Trending store settings are malformed
/// - `MarqueeError::Io` - Failed to bind the listen address
/// - `MarqueeError::Server` - Server stopped with an error
pub async fn run_server(config: MarqueeConfig, demo: bool) -> Result<(), MarqueeError> {
    let search = if demo {
        info!("Using demo movie catalog");
        SearchService::new_demo(&config)?
    } else {
        SearchService::from_config(&config)?
    };

    let app = router(AppState::new(search, &config));

    let address = format!("{}:{}", config.web.host, config.web.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Marquee running on http://{address}");

    axum::serve(listener, app)
        .await
        .map_err(MarqueeError::from_server_error)?;
    Ok(())
}
