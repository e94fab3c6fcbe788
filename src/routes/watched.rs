use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{MovieEntry, ViewingAnalysis, WatchedMovieView},
    routes::AppState,
    services::{viewing_analysis, watch_history},
};

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: i32,
}

pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<WatchedMovieView>>> {
    let movies = watch_history::list_watched(state.store.as_ref()).await?;
    Ok(Json(movies))
}

/// Handler for marking a movie as watched
pub async fn add(
    State(state): State<Arc<AppState>>,
    Json(entry): Json<MovieEntry>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let id = watch_history::add_watched(state.store.as_ref(), &entry).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "id": id }))))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<Value>> {
    watch_history::remove_watched(state.store.as_ref(), movie_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Movie {} removed from watched list", movie_id)
    })))
}

pub async fn rate(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
    Json(request): Json<RatingRequest>,
) -> AppResult<Json<Value>> {
    watch_history::update_rating(state.store.as_ref(), movie_id, request.rating).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Movie {} rated {}", movie_id, request.rating)
    })))
}

/// Handler for the viewing-habit analysis
pub async fn analysis(State(state): State<Arc<AppState>>) -> AppResult<Json<ViewingAnalysis>> {
    tracing::info!("Processing viewing analysis request");
    let analysis =
        viewing_analysis::analyze_watched(state.store.as_ref(), state.ai.as_ref()).await?;
    Ok(Json(analysis))
}
