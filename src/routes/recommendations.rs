use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{MovieEntry, MovieRecommendation, RecommendRequest, RecommendedMovieView},
    routes::AppState,
    services::{recommendations, watch_history},
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<MovieRecommendation>> {
    tracing::info!(
        include = ?request.include_genre_ids,
        exclude = ?request.excluded(),
        "Processing recommendation request"
    );

    let recommendation =
        recommendations::recommend_movie(state.store.as_ref(), state.gateway.as_ref(), &request)
            .await?;

    tracing::info!(
        movie_id = recommendation.movie_id,
        logged = recommendation.logged.is_done(),
        "Recommendation completed"
    );

    Ok(Json(recommendation.into()))
}

pub async fn history(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<RecommendedMovieView>>> {
    let movies = watch_history::list_recommended(state.store.as_ref()).await?;
    Ok(Json(movies))
}

pub async fn save(
    State(state): State<Arc<AppState>>,
    Json(entry): Json<MovieEntry>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let id = watch_history::save_recommended(state.store.as_ref(), &entry).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "id": id }))))
}
