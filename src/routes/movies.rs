use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Genre, ReviewSummary},
    routes::AppState,
    services::reviews,
};

/// Handler for the TMDB genre catalogue
pub async fn list_genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.gateway.list_genres().await?;
    Ok(Json(genres))
}

/// Handler for the AI review summary of a movie
pub async fn review_summary(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<ReviewSummary>> {
    let summary =
        reviews::summarize_reviews(state.gateway.as_ref(), state.ai.as_ref(), movie_id).await?;
    Ok(Json(summary))
}
