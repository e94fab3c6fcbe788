use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Movie data submitted when logging a watched or recommended movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieEntry {
    pub movie_id: i64,
    pub title: String,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
}

impl MovieEntry {
    /// Genre names serialized the way they are stored
    pub fn genres_json(&self) -> Option<String> {
        self.genres
            .as_ref()
            .and_then(|genres| serde_json::to_string(genres).ok())
    }

    /// Empty poster strings are stored as NULL
    pub fn poster(&self) -> Option<&str> {
        self.poster.as_deref().filter(|p| !p.is_empty())
    }
}

/// Parses a stored genre list. Malformed JSON yields no genres.
pub fn parse_genres(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(genres) => genres,
        Err(e) => {
            tracing::debug!(error = %e, raw = %raw, "Skipping malformed stored genre list");
            Vec::new()
        }
    }
}

/// A row from the `watched_movies` table
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct WatchedMovie {
    pub id: i64,
    pub movie_id: i64,
    pub title: String,
    pub poster: Option<String>,
    pub genres: Option<String>,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl WatchedMovie {
    pub fn genre_names(&self) -> Vec<String> {
        parse_genres(self.genres.as_deref())
    }

    /// The rating, treating 0 as unrated
    pub fn effective_rating(&self) -> Option<i32> {
        self.rating.filter(|r| *r > 0)
    }
}

/// A row from the `recommended_movies` table
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RecommendedMovie {
    pub id: i64,
    pub movie_id: i64,
    pub title: String,
    pub poster: Option<String>,
    pub genres: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Watched movie as returned to clients, with genres decoded
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchedMovieView {
    pub id: i64,
    pub movie_id: i64,
    pub title: String,
    pub poster: Option<String>,
    pub genres: Vec<String>,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<WatchedMovie> for WatchedMovieView {
    fn from(movie: WatchedMovie) -> Self {
        let genres = movie.genre_names();
        let rating = movie.effective_rating();
        Self {
            id: movie.id,
            movie_id: movie.movie_id,
            title: movie.title,
            poster: movie.poster,
            genres,
            rating,
            created_at: movie.created_at,
        }
    }
}

/// Recommended movie as returned to clients, with genres decoded
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedMovieView {
    pub id: i64,
    pub movie_id: i64,
    pub title: String,
    pub poster: Option<String>,
    pub genres: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<RecommendedMovie> for RecommendedMovieView {
    fn from(movie: RecommendedMovie) -> Self {
        let genres = parse_genres(movie.genres.as_deref());
        Self {
            id: movie.id,
            movie_id: movie.movie_id,
            title: movie.title,
            poster: movie.poster,
            genres,
            created_at: movie.created_at,
        }
    }
}
