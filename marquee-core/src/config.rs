//! Runtime settings for Marquee.
//!
//! Defaults target the public TMDB API and an in-memory trending store.
//! Environment variables fill in the TMDB token, the Appwrite collection
//! and the bind address.

use std::time::Duration;

/// Settings for the lookup API, the trending store, search input and the
/// web server.
///
/// Built from `Default` and then overridden by `from_env`.
#[derive(Debug, Clone, Default)]
pub struct MarqueeConfig {
    pub tmdb: TmdbConfig,
    pub trending: TrendingConfig,
    pub search: SearchConfig,
    pub web: WebConfig,
}

/// Movie metadata API configuration.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// Base URL of the API, without trailing slash
    pub base_url: String,
    /// Bearer token; requests go out unauthenticated when absent
    pub api_token: Option<String>,
    /// Prefix joined with a movie's `poster_path` to form an image URL
    pub image_base_url: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_token: None,
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
        }
    }
}

/// Hosted trending store configuration.
///
/// The Appwrite fields are all optional; when any of them is missing the
/// service falls back to an in-memory store.
#[derive(Debug, Clone)]
pub struct TrendingConfig {
    /// Appwrite API endpoint, e.g. `https://cloud.appwrite.io/v1`
    pub endpoint: Option<String>,
    /// Appwrite project identifier
    pub project_id: Option<String>,
    /// Server API key sent as `X-Appwrite-Key`
    pub api_key: Option<String>,
    /// Database holding the search-count collection
    pub database_id: Option<String>,
    /// Collection holding one document per search term
    pub collection_id: Option<String>,
    /// Number of records shown in the trending list
    pub limit: usize,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            project_id: None,
            api_key: None,
            database_id: None,
            collection_id: None,
            limit: 5,
        }
    }
}

impl TrendingConfig {
    /// Returns true when every field needed to reach Appwrite is present.
    pub fn is_remote(&self) -> bool {
        self.endpoint.is_some()
            && self.project_id.is_some()
            && self.database_id.is_some()
            && self.collection_id.is_some()
    }
}

/// Query handling configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet period before a changed query is looked up
    pub debounce: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
        }
    }
}

/// Web server bind configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl MarqueeConfig {
    /// Creates configuration with environment variable overrides.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset. Values that fail to parse keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(token) = var("TMDB_API_KEY") {
            config.tmdb.api_token = Some(token);
        }

        if let Some(base_url) = var("TMDB_BASE_URL") {
            config.tmdb.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Some(image_base) = var("TMDB_IMAGE_BASE_URL") {
            config.tmdb.image_base_url = image_base.trim_end_matches('/').to_string();
        }

        config.trending.endpoint = var("APPWRITE_ENDPOINT");
        config.trending.project_id = var("APPWRITE_PROJECT_ID");
        config.trending.api_key = var("APPWRITE_API_KEY");
        config.trending.database_id = var("APPWRITE_DATABASE_ID");
        config.trending.collection_id = var("APPWRITE_COLLECTION_ID");

        if let Some(limit) = var("MARQUEE_TRENDING_LIMIT") {
            if let Ok(count) = limit.parse::<usize>() {
                config.trending.limit = count;
            }
        }

        if let Some(debounce) = var("MARQUEE_DEBOUNCE_MS") {
            if let Ok(millis) = debounce.parse::<u64>() {
                config.search.debounce = Duration::from_millis(millis);
            }
        }

        if let Some(host) = var("MARQUEE_HOST") {
            config.web.host = host;
        }

        if let Some(port) = var("MARQUEE_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.web.port = port;
            }
        }

        config
    }

    /// Creates a configuration pointing at local stub servers, for tests.
    pub fn for_testing(tmdb_base_url: &str) -> Self {
        Self {
            tmdb: TmdbConfig {
                base_url: tmdb_base_url.trim_end_matches('/').to_string(),
                api_token: Some("test-token".to_string()),
                ..Default::default()
            },
            search: SearchConfig {
                debounce: Duration::from_millis(10),
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_values() {
        let config = MarqueeConfig::default();

        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
        assert!(config.tmdb.api_token.is_none());
        assert_eq!(config.trending.limit, 5);
        assert!(!config.trending.is_remote());
        assert_eq!(config.search.debounce, Duration::from_millis(500));
        assert_eq!(config.web.port, 3000);
    }

    #[test]
    fn test_env_override() {
        let config = MarqueeConfig::from_lookup(lookup_from(&[
            ("TMDB_API_KEY", "secret"),
            ("TMDB_BASE_URL", "http://localhost:9000/3/"),
            ("APPWRITE_ENDPOINT", "https://cloud.appwrite.io/v1"),
            ("APPWRITE_PROJECT_ID", "project"),
            ("APPWRITE_DATABASE_ID", "db"),
            ("APPWRITE_COLLECTION_ID", "metrics"),
            ("MARQUEE_TRENDING_LIMIT", "10"),
            ("MARQUEE_DEBOUNCE_MS", "250"),
            ("MARQUEE_PORT", "8080"),
        ]));

        assert_eq!(config.tmdb.api_token.as_deref(), Some("secret"));
        assert_eq!(config.tmdb.base_url, "http://localhost:9000/3");
        assert!(config.trending.is_remote());
        assert_eq!(config.trending.limit, 10);
        assert_eq!(config.search.debounce, Duration::from_millis(250));
        assert_eq!(config.web.port, 8080);
    }

    #[test]
    fn test_unparseable_and_empty_values_keep_defaults() {
        let config = MarqueeConfig::from_lookup(lookup_from(&[
            ("TMDB_API_KEY", "   "),
            ("MARQUEE_TRENDING_LIMIT", "many"),
            ("MARQUEE_PORT", "99999"),
        ]));

        assert!(config.tmdb.api_token.is_none());
        assert_eq!(config.trending.limit, 5);
        assert_eq!(config.web.port, 3000);
    }

    #[test]
    fn test_partial_appwrite_config_is_not_remote() {
        let config = MarqueeConfig::from_lookup(lookup_from(&[
            ("APPWRITE_ENDPOINT", "https://cloud.appwrite.io/v1"),
            ("APPWRITE_PROJECT_ID", "project"),
        ]));

        assert!(!config.trending.is_remote());
    }
}
