//! Row store abstraction
//!
//! Every read and write of persisted state goes through [`MovieStore`], so the
//! services never know whether rows live in PostgreSQL or in memory.

use crate::{
    error::AppResult,
    models::{MovieEntry, RecommendedMovie, WatchedMovie},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    /// Returns the stored TMDB credential, if one was configured
    async fn tmdb_api_key(&self) -> AppResult<Option<String>>;

    /// Inserts or replaces the single TMDB credential row
    async fn set_tmdb_api_key(&self, api_key: &str) -> AppResult<()>;

    /// Appends to the recommendation log and returns the new row id
    async fn insert_recommended(&self, entry: &MovieEntry) -> AppResult<i64>;

    /// All recommendation log rows, newest first
    async fn list_recommended(&self) -> AppResult<Vec<RecommendedMovie>>;

    /// Inserts a watched movie. Fails with `Duplicate` if `movie_id` is already present.
    async fn insert_watched(&self, entry: &MovieEntry) -> AppResult<i64>;

    async fn find_watched(&self, movie_id: i64) -> AppResult<Option<WatchedMovie>>;

    /// All watched movies, newest first
    async fn list_watched(&self) -> AppResult<Vec<WatchedMovie>>;

    /// Deletes by movie id and returns the number of rows removed
    async fn delete_watched(&self, movie_id: i64) -> AppResult<u64>;

    /// Sets the rating by movie id and returns the number of rows updated
    async fn update_watched_rating(&self, movie_id: i64, rating: i32) -> AppResult<u64>;
}
