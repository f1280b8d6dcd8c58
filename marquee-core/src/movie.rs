//! Movie record as returned by the metadata API.

use serde::{Deserialize, Deserializer, Serialize};

/// A movie from the metadata API.
///
/// Marquee does not own or validate this record. The fields it reads are
/// typed; everything else the API sends is kept in `extra` and serialized
/// back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Movie {
    /// Creates a movie with just an id and title.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            popularity: None,
            vote_average: None,
            release_date: None,
            original_language: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Sets the poster path.
    pub fn with_poster(mut self, poster_path: impl Into<String>) -> Self {
        self.poster_path = Some(poster_path.into());
        self
    }

    /// Full poster URL under the given image base, if the movie has a poster.
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", image_base_url.trim_end_matches('/'), path))
    }

    /// Release year parsed from `release_date` (`YYYY-MM-DD`).
    pub fn release_year(&self) -> Option<u16> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .and_then(|year| year.parse().ok())
    }
}

/// Reads a missing or `null` field as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_pass_through() {
        let raw = serde_json::json!({
            "id": 268,
            "title": "Batman",
            "poster_path": "/p.jpg",
            "adult": false,
            "genre_ids": [14, 28]
        });

        let movie: Movie = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(movie.title, "Batman");
        assert_eq!(movie.extra.get("adult"), Some(&serde_json::json!(false)));

        let back = serde_json::to_value(&movie).unwrap();
        assert_eq!(back["genre_ids"], raw["genre_ids"]);
    }

    #[test]
    fn test_null_or_missing_id_and_title_default() {
        let untitled: Movie = serde_json::from_value(serde_json::json!({
            "id": 2,
            "title": null
        }))
        .unwrap();
        assert_eq!(untitled.id, 2);
        assert_eq!(untitled.title, "");

        let bare: Movie = serde_json::from_value(serde_json::json!({ "title": "No id" })).unwrap();
        assert_eq!(bare.id, 0);
        assert_eq!(bare.title, "No id");
    }

    #[test]
    fn test_poster_url() {
        let movie = Movie::new(1, "Batman").with_poster("/p.jpg");
        assert_eq!(
            movie.poster_url("https://image.tmdb.org/t/p/w500/").as_deref(),
            Some("https://image.tmdb.org/t/p/w500/p.jpg")
        );
        assert_eq!(Movie::new(2, "No Poster").poster_url("https://x"), None);
    }

    #[test]
    fn test_release_year() {
        let mut movie = Movie::new(1, "Batman");
        movie.release_date = Some("1989-06-23".to_string());
        assert_eq!(movie.release_year(), Some(1989));

        movie.release_date = Some(String::new());
        assert_eq!(movie.release_year(), None);
    }
}
