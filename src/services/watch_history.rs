use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{MovieEntry, RecommendedMovieView, WatchedMovieView},
};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

fn validate_entry(entry: &MovieEntry) -> AppResult<()> {
    if entry.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Movie title must not be empty".to_string()));
    }
    Ok(())
}

/// Records a watched movie and returns its row id
pub async fn add_watched(store: &dyn MovieStore, entry: &MovieEntry) -> AppResult<i64> {
    validate_entry(entry)?;

    if store.find_watched(entry.movie_id).await?.is_some() {
        return Err(AppError::Duplicate(format!(
            "Movie {} is already in the watched list",
            entry.movie_id
        )));
    }

    // The store rejects duplicates too, for inserts racing past the lookup
    let id = store.insert_watched(entry).await?;
    tracing::info!(movie_id = entry.movie_id, id, "Marked movie as watched");
    Ok(id)
}

pub async fn remove_watched(store: &dyn MovieStore, movie_id: i64) -> AppResult<()> {
    let removed = store.delete_watched(movie_id).await?;
    if removed == 0 {
        return Err(AppError::NotFound(format!(
            "Movie {} is not in the watched list",
            movie_id
        )));
    }

    tracing::info!(movie_id, "Removed movie from watched list");
    Ok(())
}

/// Watched movies, newest first
pub async fn list_watched(store: &dyn MovieStore) -> AppResult<Vec<WatchedMovieView>> {
    let movies = store.list_watched().await?;
    Ok(movies.into_iter().map(WatchedMovieView::from).collect())
}

pub async fn update_rating(store: &dyn MovieStore, movie_id: i64, rating: i32) -> AppResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::InvalidInput(format!(
            "Rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, rating
        )));
    }

    let updated = store.update_watched_rating(movie_id, rating).await?;
    if updated == 0 {
        return Err(AppError::NotFound(format!(
            "Movie {} is not in the watched list",
            movie_id
        )));
    }

    tracing::info!(movie_id, rating, "Updated movie rating");
    Ok(())
}

/// Appends to the recommendation log
pub async fn save_recommended(store: &dyn MovieStore, entry: &MovieEntry) -> AppResult<i64> {
    validate_entry(entry)?;
    store.insert_recommended(entry).await
}

/// Recommendation log, newest first
pub async fn list_recommended(store: &dyn MovieStore) -> AppResult<Vec<RecommendedMovieView>> {
    let movies = store.list_recommended().await?;
    Ok(movies.into_iter().map(RecommendedMovieView::from).collect())
}
