use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use cinepick_api::{
    db::{InMemoryMovieStore, MovieStore},
    error::{AppError, AppResult},
    models::{ApiReview, Genre, MovieSummary, MovieVideo, WatchProviders},
    routes::{create_router, AppState},
    services::{
        ai::{AiClient, ChatMessage},
        tmdb::MetadataGateway,
    },
};

/// Gateway serving a fixed catalogue without network access
struct FakeGateway;

#[async_trait::async_trait]
impl MetadataGateway for FakeGateway {
    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        Ok(vec![
            Genre::new(28, "Ação"),
            Genre::new(35, "Comédia"),
            Genre::new(18, "Drama"),
            Genre::new(27, "Terror"),
            Genre::new(10749, "Romance"),
        ])
    }

    async fn discover(&self, _include: &[i64], _exclude: &[i64]) -> AppResult<Vec<MovieSummary>> {
        Ok(vec![MovieSummary {
            id: 603,
            title: "Matrix".to_string(),
            overview: "Um hacker descobre a verdade sobre a realidade.".to_string(),
            poster_url: "https://image.tmdb.org/t/p/w500/matrix.jpg".to_string(),
        }])
    }

    async fn movie_genres(&self, _movie_id: i64) -> AppResult<Vec<String>> {
        Ok(vec!["Ação".to_string()])
    }

    async fn movie_videos(&self, _movie_id: i64) -> AppResult<Vec<MovieVideo>> {
        Err(AppError::ExternalApi("TMDB API returned status 503: unavailable".to_string()))
    }

    async fn watch_providers(&self, _movie_id: i64) -> AppResult<Option<WatchProviders>> {
        Ok(None)
    }

    async fn movie_reviews(&self, _movie_id: i64) -> AppResult<Vec<ApiReview>> {
        Ok(vec![])
    }
}

/// AI client answering every request with the same object
struct FakeAi {
    object: Value,
}

#[async_trait::async_trait]
impl AiClient for FakeAi {
    async fn generate_object(&self, _messages: Vec<ChatMessage>, _schema: Value) -> AppResult<Value> {
        Ok(self.object.clone())
    }
}

fn create_test_server() -> (TestServer, InMemoryMovieStore) {
    let store = InMemoryMovieStore::new();
    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(FakeGateway),
        Arc::new(FakeAi {
            object: json!({
                "analysis": "Você adora filmes de ação.",
                "recommendations": ["John Wick"]
            }),
        }),
    );
    let app = create_router(state);
    (TestServer::new(app).unwrap(), store)
}

async fn add_watched(server: &TestServer, movie_id: i64, title: &str, genres: &[&str]) {
    let response = server
        .post("/api/v1/watched")
        .json(&json!({
            "movieId": movie_id,
            "title": title,
            "poster": "https://image.tmdb.org/t/p/w500/poster.jpg",
            "genres": genres
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_add_and_list_watched() {
    let (server, _) = create_test_server();
    add_watched(&server, 550, "Clube da Luta", &["Drama"]).await;
    add_watched(&server, 603, "Matrix", &["Ação"]).await;

    let response = server.get("/api/v1/watched").await;
    response.assert_status_ok();
    let movies: Vec<Value> = response.json();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0]["movieId"], 603);
    assert_eq!(movies[1]["genres"], json!(["Drama"]));
}

#[tokio::test]
async fn test_duplicate_watched_is_conflict() {
    let (server, store) = create_test_server();
    add_watched(&server, 550, "Clube da Luta", &["Drama"]).await;

    let response = server
        .post("/api/v1/watched")
        .json(&json!({"movieId": 550, "title": "Clube da Luta"}))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(store.list_watched().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_remove_missing_watched_is_not_found() {
    let (server, _) = create_test_server();
    add_watched(&server, 550, "Clube da Luta", &["Drama"]).await;

    let response = server.delete("/api/v1/watched/999").await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("999"));

    let movies: Vec<Value> = server.get("/api/v1/watched").await.json();
    assert_eq!(movies.len(), 1);

    server.delete("/api/v1/watched/550").await.assert_status_ok();
    let movies: Vec<Value> = server.get("/api/v1/watched").await.json();
    assert!(movies.is_empty());
}

#[tokio::test]
async fn test_rating_update() {
    let (server, _) = create_test_server();
    add_watched(&server, 550, "Clube da Luta", &["Drama"]).await;

    server
        .put("/api/v1/watched/550/rating")
        .json(&json!({"rating": 6}))
        .await
        .assert_status_bad_request();

    server
        .put("/api/v1/watched/999/rating")
        .json(&json!({"rating": 4}))
        .await
        .assert_status_not_found();

    server
        .put("/api/v1/watched/550/rating")
        .json(&json!({"rating": 4}))
        .await
        .assert_status_ok();

    let movies: Vec<Value> = server.get("/api/v1/watched").await.json();
    assert_eq!(movies[0]["rating"], 4);
}

#[tokio::test]
async fn test_recommendation_validates_genre_count() {
    let (server, store) = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({"includeGenreIds": [28, 35, 18, 27]}))
        .await;
    response.assert_status_bad_request();
    assert!(store.list_recommended().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_recommendation_is_logged_despite_failed_enrichment() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({"includeGenreIds": [28], "excludeGenreIds": [27]}))
        .await;
    response.assert_status_ok();
    let movie: Value = response.json();
    assert_eq!(movie["movieId"], 603);
    assert_eq!(movie["genres"], json!(["Ação"]));
    assert!(movie.get("videos").is_none());
    assert!(movie.get("watchProviders").is_none());

    let history: Vec<Value> = server.get("/api/v1/recommendations/history").await.json();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["genres"], json!(["Ação"]));
}

#[tokio::test]
async fn test_genre_suggestions_cold_start() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/v1/genre-suggestions")
        .json(&json!({"preference": "new"}))
        .await;
    response.assert_status_ok();
    let suggestion: Value = response.json();
    let ids: Vec<i64> = suggestion["suggestedGenres"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![28, 35, 18]);
}

#[tokio::test]
async fn test_genre_suggestions_new_skip_watched() {
    let (server, _) = create_test_server();
    add_watched(&server, 550, "Clube da Luta", &["Drama"]).await;
    add_watched(&server, 603, "Matrix", &["Ação"]).await;

    let response = server
        .post("/api/v1/genre-suggestions")
        .json(&json!({"preference": "new"}))
        .await;
    response.assert_status_ok();
    let suggestion: Value = response.json();
    let names: Vec<&str> = suggestion["suggestedGenres"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 3);
    assert!(!names.contains(&"Drama"));
    assert!(!names.contains(&"Ação"));
}

#[tokio::test]
async fn test_viewing_analysis_scenario() {
    let (server, _) = create_test_server();
    add_watched(&server, 1, "Matrix", &["Ação"]).await;
    add_watched(&server, 2, "Velozes e Furiosos", &["Ação"]).await;
    add_watched(&server, 3, "Clube da Luta", &["Drama"]).await;
    server
        .put("/api/v1/watched/1/rating")
        .json(&json!({"rating": 5}))
        .await
        .assert_status_ok();
    server
        .put("/api/v1/watched/2/rating")
        .json(&json!({"rating": 3}))
        .await
        .assert_status_ok();

    let response = server.get("/api/v1/watched/analysis").await;
    response.assert_status_ok();
    let analysis: Value = response.json();

    assert_eq!(analysis["analysis"], "Você adora filmes de ação.");
    assert_eq!(
        analysis["ratingStats"],
        json!({
            "averageRating": 4.0,
            "totalMovies": 3,
            "highlyRated": 1,
            "mediumRated": 1,
            "lowRated": 0
        })
    );
    assert_eq!(
        analysis["genreStats"],
        json!([
            {"genre": "Ação", "count": 2, "averageRating": 4.0, "percentage": 67},
            {"genre": "Drama", "count": 1, "averageRating": 0.0, "percentage": 33}
        ])
    );
}

#[tokio::test]
async fn test_review_summary_without_reviews() {
    let (server, _) = create_test_server();

    let response = server.get("/api/v1/movies/550/reviews").await;
    response.assert_status_ok();
    let summary: Value = response.json();
    assert_eq!(summary["sentiment"], "neutro");
    assert_eq!(summary["keyPoints"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_set_tmdb_credential() {
    let (server, store) = create_test_server();

    server
        .put("/api/v1/credentials/tmdb")
        .json(&json!({"apiKey": ""}))
        .await
        .assert_status_bad_request();

    server
        .put("/api/v1/credentials/tmdb")
        .json(&json!({"apiKey": "abc123"}))
        .await
        .assert_status_ok();
    assert_eq!(store.tmdb_api_key().await.unwrap().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_list_genres() {
    let (server, _) = create_test_server();

    let genres: Vec<Value> = server.get("/api/v1/genres").await.json();
    assert_eq!(genres.len(), 5);
    assert_eq!(genres[0], json!({"id": 28, "name": "Ação"}));
}
