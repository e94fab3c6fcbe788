use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinepick_api::{
    config::Config,
    db::{create_pool, run_migrations, InMemoryMovieStore, MovieStore, PgMovieStore},
    routes::{create_router, AppState},
    services::{ai::HttpAiClient, tmdb::TmdbGateway},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinepick_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        language = %config.tmdb_language,
        region = %config.watch_region,
        "Loaded configuration"
    );

    let store: Arc<dyn MovieStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            run_migrations(&pool).await?;
            tracing::info!("Connected to PostgreSQL and applied migrations");
            Arc::new(PgMovieStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, watch history will be kept in memory");
            Arc::new(InMemoryMovieStore::new())
        }
    };

    if config.ai_api_url.is_none() {
        tracing::warn!("AI_API_URL not set, analysis and review summaries are unavailable");
    }

    let gateway = Arc::new(TmdbGateway::new(&config, store.clone())?);
    let ai = Arc::new(HttpAiClient::new(&config)?);
    let app = create_router(AppState::new(store, gateway, ai));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
