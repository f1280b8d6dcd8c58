//! Demo provider with a built-in catalog.
//!
//! Lets the UI run end to end without a TMDB token.

use async_trait::async_trait;
use marquee_core::Movie;

use super::MovieLookupProvider;
use crate::errors::MovieLookupError;
use crate::types::MovieQuery;

/// Provider serving a small fixed catalog.
///
/// The unscoped listing returns the whole catalog by popularity; searches
/// match titles case-insensitively.
#[derive(Debug)]
pub struct DemoProvider {
    catalog: Vec<Movie>,
}

impl DemoProvider {
    /// Creates the provider with its built-in catalog.
    pub fn new() -> Self {
        let entries = [
            (155, "The Dark Knight", "/qJ2tW6WMUDux911r6m7haRef0WH.jpg", 98.4, 8.5, "2008-07-16"),
            (268, "Batman", "/cij4dd21v2Rk2YtUQbV5kW69WB2.jpg", 41.2, 7.2, "1989-06-21"),
            (603, "The Matrix", "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg", 87.1, 8.2, "1999-03-31"),
            (27205, "Inception", "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg", 92.7, 8.4, "2010-07-15"),
            (157336, "Interstellar", "/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg", 110.3, 8.4, "2014-11-05"),
            (13, "Forrest Gump", "/arw2vcBveWOVZr6pxd9XTd1TdQa.jpg", 64.0, 8.5, "1994-06-23"),
        ];

        let mut catalog: Vec<Movie> = entries
            .into_iter()
            .map(|(id, title, poster, popularity, rating, released)| {
                let mut movie = Movie::new(id, title).with_poster(poster);
                movie.popularity = Some(popularity);
                movie.vote_average = Some(rating);
                movie.release_date = Some(released.to_string());
                movie.original_language = Some("en".to_string());
                movie
            })
            .collect();

        catalog.sort_by(|a, b| {
            b.popularity
                .unwrap_or_default()
                .total_cmp(&a.popularity.unwrap_or_default())
        });

        Self { catalog }
    }
}

impl Default for DemoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MovieLookupProvider for DemoProvider {
    async fn lookup(&self, query: &MovieQuery) -> Result<Vec<Movie>, MovieLookupError> {
        let movies = match query {
            MovieQuery::Discover => self.catalog.clone(),
            MovieQuery::Search(text) => {
                let needle = text.to_lowercase();
                self.catalog
                    .iter()
                    .filter(|movie| movie.title.to_lowercase().contains(&needle))
                    .cloned()
                    .collect()
            }
        };

        Ok(movies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_discover_sorted_by_popularity() {
        let movies = DemoProvider::new()
            .lookup(&MovieQuery::Discover)
            .await
            .unwrap();

        assert_eq!(movies[0].title, "Interstellar");
        assert_eq!(movies.len(), 6);
    }

    #[tokio::test]
    async fn test_search_matches_title_substring() {
        let provider = DemoProvider::new();

        let movies = provider
            .lookup(&MovieQuery::Search("BAT".to_string()))
            .await
            .unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id, 268);

        let none = provider
            .lookup(&MovieQuery::Search("zzz".to_string()))
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
