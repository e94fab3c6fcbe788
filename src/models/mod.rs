use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod analysis;
pub mod genre;
pub mod movie;
pub mod recommendation;

pub use analysis::{GenreStat, RatingStats, ReviewSummary, ViewingAnalysis};
pub use genre::{Genre, GenreSuggestion, Preference, SuggestedGenre};
pub use movie::{MovieEntry, RecommendedMovie, RecommendedMovieView, WatchedMovie, WatchedMovieView};
pub use recommendation::{
    BestEffort, MovieRecommendation, MovieSummary, MovieVideo, RecommendRequest, Recommendation, WatchProvider,
    WatchProviders,
};

// ============================================================================
// TMDB API Types
// ============================================================================

/// GET /genre/movie/list
#[derive(Debug, Clone, Deserialize)]
pub struct ApiGenreList {
    pub genres: Vec<Genre>,
}

/// GET /discover/movie
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDiscoverPage {
    #[serde(default)]
    pub results: Vec<ApiMovieSummary>,
}

/// A single discovery result
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ApiMovieSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// GET /movie/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMovieDetail {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// GET /movie/{id}/videos
#[derive(Debug, Clone, Deserialize)]
pub struct ApiVideoList {
    #[serde(default)]
    pub results: Vec<MovieVideo>,
}

/// GET /movie/{id}/watch/providers, keyed by region code
#[derive(Debug, Clone, Deserialize)]
pub struct ApiWatchProviderResults {
    #[serde(default)]
    pub results: HashMap<String, ApiRegionProviders>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiRegionProviders {
    #[serde(default)]
    pub flatrate: Option<Vec<ApiProvider>>,
    #[serde(default)]
    pub rent: Option<Vec<ApiProvider>>,
    #[serde(default)]
    pub buy: Option<Vec<ApiProvider>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiProvider {
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

/// GET /movie/{id}/reviews
#[derive(Debug, Clone, Deserialize)]
pub struct ApiReviewPage {
    #[serde(default)]
    pub results: Vec<ApiReview>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiReview {
    pub author: String,
    pub content: String,
}
