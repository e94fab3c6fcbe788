use axum::{
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::middleware::request_id::{make_span_with_request_id, request_id_header};

pub mod credentials;
pub mod movies;
pub mod recommendations;
pub mod state;
pub mod suggestions;
pub mod watched;

pub use state::AppState;

/// Creates the application router with all routes
///
/// Layers run outermost first: CORS, request ID assignment, tracing, then
/// request ID propagation onto the response.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(Arc::new(state))
        .layer(PropagateRequestIdLayer::new(request_id_header()))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/credentials/tmdb", put(credentials::set_tmdb_key))
        .route("/genres", get(movies::list_genres))
        .route("/movies/:movie_id/reviews", get(movies::review_summary))
        .route("/recommendations", post(recommendations::recommend))
        .route(
            "/recommendations/history",
            get(recommendations::history).post(recommendations::save),
        )
        .route("/watched", get(watched::list).post(watched::add))
        .route("/watched/analysis", get(watched::analysis))
        .route("/watched/:movie_id", delete(watched::remove))
        .route("/watched/:movie_id/rating", put(watched::rate))
        .route("/genre-suggestions", post(suggestions::suggest))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
