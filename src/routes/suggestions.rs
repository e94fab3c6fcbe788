use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{GenreSuggestion, Preference},
    routes::AppState,
    services::genre_suggestions,
};

#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    pub preference: Preference,
}

/// Handler for genre suggestions endpoint
pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SuggestionRequest>,
) -> AppResult<Json<GenreSuggestion>> {
    tracing::info!(preference = ?request.preference, "Processing genre suggestion request");

    let suggestion = genre_suggestions::suggest_genres(
        state.store.as_ref(),
        state.gateway.as_ref(),
        request.preference,
    )
    .await?;

    Ok(Json(suggestion))
}
