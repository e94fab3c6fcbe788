use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{error::AppResult, routes::AppState, services::credentials};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TmdbKeyRequest {
    pub api_key: String,
}

/// Handler for storing the TMDB credential
pub async fn set_tmdb_key(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TmdbKeyRequest>,
) -> AppResult<Json<Value>> {
    credentials::set_tmdb_api_key(state.store.as_ref(), &request.api_key).await?;
    Ok(Json(json!({ "success": true, "message": "TMDB API key updated" })))
}
