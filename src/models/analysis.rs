use serde::{Deserialize, Serialize};

/// Per-genre statistics derived from the watch history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenreStat {
    pub genre: String,
    pub count: usize,
    /// Mean of the ratings given to movies of this genre, one decimal
    pub average_rating: f64,
    /// Share of all watched movies, rounded to a whole percent
    pub percentage: u32,
}

/// Rating distribution over the watch history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    pub average_rating: f64,
    pub total_movies: usize,
    /// Ratings of 4 or 5
    pub highly_rated: usize,
    /// Ratings of 3
    pub medium_rated: usize,
    /// Ratings of 1 or 2
    pub low_rated: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewingAnalysis {
    pub analysis: String,
    pub genre_stats: Vec<GenreStat>,
    pub rating_stats: RatingStats,
    pub recommendations: Vec<String>,
}

/// AI-generated digest of a movie's reviews
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub summary: String,
    pub sentiment: String,
    pub key_points: Vec<String>,
}
