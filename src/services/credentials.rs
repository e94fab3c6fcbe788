use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    services::tmdb::TmdbCredential,
};

/// Stores the TMDB credential used by every gateway call
pub async fn set_tmdb_api_key(store: &dyn MovieStore, api_key: &str) -> AppResult<()> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(AppError::InvalidInput("TMDB API key must not be empty".to_string()));
    }

    store.set_tmdb_api_key(api_key).await?;

    let mode = match TmdbCredential::from_stored(api_key.to_string()) {
        TmdbCredential::Bearer(_) => "bearer",
        TmdbCredential::ApiKey(_) => "api_key",
    };
    tracing::info!(mode, "TMDB credential updated");
    Ok(())
}
