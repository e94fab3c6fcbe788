use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{MovieEntry, RecommendedMovie, WatchedMovie},
};

const MOVIE_COLUMNS: &str = "id, movie_id, title, poster, genres, created_at";
const WATCHED_COLUMNS: &str = "id, movie_id, title, poster, genres, rating, created_at";

/// The credential table holds exactly one row with this id
const CREDENTIAL_ROW_ID: i32 = 1;

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded migrations in `migrations/`
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// [`MovieStore`] backed by PostgreSQL
#[derive(Clone)]
pub struct PgMovieStore {
    pool: PgPool,
}

impl PgMovieStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MovieStore for PgMovieStore {
    async fn tmdb_api_key(&self) -> AppResult<Option<String>> {
        let key: Option<String> = sqlx::query_scalar("SELECT api_key FROM tmdb_api_key WHERE id = $1")
            .bind(CREDENTIAL_ROW_ID)
            .fetch_optional(&self.pool)
            .await?;
        Ok(key)
    }

    async fn set_tmdb_api_key(&self, api_key: &str) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO tmdb_api_key (id, api_key) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET api_key = EXCLUDED.api_key",
        )
        .bind(CREDENTIAL_ROW_ID)
        .bind(api_key)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_recommended(&self, entry: &MovieEntry) -> AppResult<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO recommended_movies (movie_id, title, poster, genres) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(entry.movie_id)
        .bind(&entry.title)
        .bind(entry.poster())
        .bind(entry.genres_json())
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn list_recommended(&self) -> AppResult<Vec<RecommendedMovie>> {
        let query = format!(
            "SELECT {MOVIE_COLUMNS} FROM recommended_movies ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, RecommendedMovie>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_watched(&self, entry: &MovieEntry) -> AppResult<i64> {
        sqlx::query_scalar(
            "INSERT INTO watched_movies (movie_id, title, poster, genres) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(entry.movie_id)
        .bind(&entry.title)
        .bind(entry.poster())
        .bind(entry.genres_json())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_insert(e, format!("Movie {} is already watched", entry.movie_id))
        })
    }

    async fn find_watched(&self, movie_id: i64) -> AppResult<Option<WatchedMovie>> {
        let query = format!("SELECT {WATCHED_COLUMNS} FROM watched_movies WHERE movie_id = $1");
        let row = sqlx::query_as::<_, WatchedMovie>(&query)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_watched(&self) -> AppResult<Vec<WatchedMovie>> {
        let query =
            format!("SELECT {WATCHED_COLUMNS} FROM watched_movies ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, WatchedMovie>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn delete_watched(&self, movie_id: i64) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM watched_movies WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn update_watched_rating(&self, movie_id: i64, rating: i32) -> AppResult<u64> {
        let result = sqlx::query("UPDATE watched_movies SET rating = $1 WHERE movie_id = $2")
            .bind(rating)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
