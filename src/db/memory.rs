use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{MovieEntry, RecommendedMovie, WatchedMovie},
};

/// [`MovieStore`] kept in process memory
///
/// Used when no database URL is configured. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryMovieStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    tmdb_api_key: Option<String>,
    recommended: Vec<RecommendedMovie>,
    watched: Vec<WatchedMovie>,
    next_id: i64,
}

impl StoreInner {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl InMemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl MovieStore for InMemoryMovieStore {
    async fn tmdb_api_key(&self) -> AppResult<Option<String>> {
        Ok(self.inner.read().await.tmdb_api_key.clone())
    }

    async fn set_tmdb_api_key(&self, api_key: &str) -> AppResult<()> {
        self.inner.write().await.tmdb_api_key = Some(api_key.to_string());
        Ok(())
    }

    async fn insert_recommended(&self, entry: &MovieEntry) -> AppResult<i64> {
        let mut inner = self.inner.write().await;
        let id = inner.allocate_id();
        inner.recommended.push(RecommendedMovie {
            id,
            movie_id: entry.movie_id,
            title: entry.title.clone(),
            poster: entry.poster().map(str::to_string),
            genres: entry.genres_json(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_recommended(&self) -> AppResult<Vec<RecommendedMovie>> {
        let inner = self.inner.read().await;
        Ok(inner.recommended.iter().rev().cloned().collect())
    }

    async fn insert_watched(&self, entry: &MovieEntry) -> AppResult<i64> {
        let mut inner = self.inner.write().await;
        if inner.watched.iter().any(|m| m.movie_id == entry.movie_id) {
            return Err(AppError::Duplicate(format!(
                "Movie {} is already watched",
                entry.movie_id
            )));
        }

        let id = inner.allocate_id();
        inner.watched.push(WatchedMovie {
            id,
            movie_id: entry.movie_id,
            title: entry.title.clone(),
            poster: entry.poster().map(str::to_string),
            genres: entry.genres_json(),
            rating: None,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn find_watched(&self, movie_id: i64) -> AppResult<Option<WatchedMovie>> {
        let inner = self.inner.read().await;
        Ok(inner.watched.iter().find(|m| m.movie_id == movie_id).cloned())
    }

    async fn list_watched(&self) -> AppResult<Vec<WatchedMovie>> {
        let inner = self.inner.read().await;
        Ok(inner.watched.iter().rev().cloned().collect())
    }

    async fn delete_watched(&self, movie_id: i64) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.watched.len();
        inner.watched.retain(|m| m.movie_id != movie_id);
        Ok((before - inner.watched.len()) as u64)
    }

    async fn update_watched_rating(&self, movie_id: i64, rating: i32) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        match inner.watched.iter_mut().find(|m| m.movie_id == movie_id) {
            Some(movie) => {
                movie.rating = Some(rating);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
