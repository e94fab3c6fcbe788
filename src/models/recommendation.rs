use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Request for a random movie recommendation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub include_genre_ids: Vec<i64>,
    #[serde(default)]
    pub exclude_genre_ids: Option<Vec<i64>>,
}

impl RecommendRequest {
    pub fn excluded(&self) -> &[i64] {
        self.exclude_genre_ids.as_deref().unwrap_or_default()
    }
}

/// A discovery result with its poster resolved to an absolute URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    pub overview: String,
    /// Empty when the movie has no poster
    pub poster_url: String,
}

/// A trailer or clip attached to a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieVideo {
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

impl MovieVideo {
    pub fn is_youtube_trailer(&self) -> bool {
        self.site == "YouTube" && self.video_type == "Trailer"
    }
}

/// A streaming, rental or purchase provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchProvider {
    pub provider_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,
}

/// Providers for one region, grouped by availability type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WatchProviders {
    pub flatrate: Vec<WatchProvider>,
    pub rent: Vec<WatchProvider>,
    pub buy: Vec<WatchProvider>,
}

/// Outcome of a step whose failure must not abort its parent operation
#[derive(Debug, Clone, PartialEq)]
pub enum BestEffort<T> {
    Done(T),
    Skipped(String),
}

impl<T> BestEffort<T> {
    /// Captures a result, logging the failure instead of propagating it
    pub fn capture<E: Display>(result: Result<T, E>, step: &'static str) -> Self {
        match result {
            Ok(value) => BestEffort::Done(value),
            Err(e) => {
                tracing::warn!(step = step, error = %e, "Best-effort step failed, continuing");
                BestEffort::Skipped(e.to_string())
            }
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, BestEffort::Done(_))
    }

    pub fn done(self) -> Option<T> {
        match self {
            BestEffort::Done(value) => Some(value),
            BestEffort::Skipped(_) => None,
        }
    }
}

/// A selected movie together with the outcome of each enrichment step
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub movie_id: i64,
    pub title: String,
    pub overview: String,
    pub poster_url: String,
    pub genres: BestEffort<Vec<String>>,
    pub videos: BestEffort<Vec<MovieVideo>>,
    pub watch_providers: BestEffort<Option<WatchProviders>>,
    /// Row id in the recommendation log
    pub logged: BestEffort<i64>,
}

/// Recommendation as returned to clients; failed enrichments are omitted
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecommendation {
    pub movie_id: i64,
    pub title: String,
    pub overview: String,
    pub poster_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<MovieVideo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_providers: Option<WatchProviders>,
}

impl From<Recommendation> for MovieRecommendation {
    fn from(rec: Recommendation) -> Self {
        Self {
            movie_id: rec.movie_id,
            title: rec.title,
            overview: rec.overview,
            poster_url: rec.poster_url,
            genres: rec.genres.done().filter(|g| !g.is_empty()),
            videos: rec.videos.done().filter(|v| !v.is_empty()),
            watch_providers: rec.watch_providers.done().flatten(),
        }
    }
}
