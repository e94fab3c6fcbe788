use std::collections::HashMap;

use serde_json::json;

use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{GenreStat, RatingStats, ViewingAnalysis, WatchedMovie},
    services::ai::{string_field, string_list_field, AiClient, ChatMessage},
};

/// Number of genres included in the AI prompt
const PROMPT_GENRE_LIMIT: usize = 5;

const FALLBACK_ANALYSIS: &str = "The analysis of your viewing habits is not available right now.";

#[derive(Debug, Default)]
struct GenreAccumulator {
    name: String,
    count: usize,
    ratings: Vec<i32>,
}

#[derive(Debug, Default)]
struct RatingAccumulator {
    total_rating: i64,
    rated: usize,
    highly_rated: usize,
    medium_rated: usize,
    low_rated: usize,
}

impl RatingAccumulator {
    fn add(&mut self, rating: i32) {
        self.total_rating += i64::from(rating);
        self.rated += 1;
        match rating {
            4.. => self.highly_rated += 1,
            3 => self.medium_rated += 1,
            _ => self.low_rated += 1,
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn average(total: i64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        round_one_decimal(total as f64 / count as f64)
    }
}

/// Genre and rating statistics over the whole watch history.
///
/// Unrated movies count toward `total_movies` and genre counts but are left
/// out of every rating aggregate. Genres are sorted by count, most watched first.
pub fn compute_statistics(movies: &[WatchedMovie]) -> (Vec<GenreStat>, RatingStats) {
    let mut genres: Vec<GenreAccumulator> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut ratings = RatingAccumulator::default();

    for movie in movies {
        let rating = movie.effective_rating();
        if let Some(r) = rating {
            ratings.add(r);
        }

        for name in movie.genre_names() {
            let slot = *index.entry(name.clone()).or_insert_with(|| {
                genres.push(GenreAccumulator {
                    name: name.clone(),
                    ..Default::default()
                });
                genres.len() - 1
            });
            let genre = &mut genres[slot];
            genre.count += 1;
            if let Some(r) = rating {
                genre.ratings.push(r);
            }
        }
    }

    let total = movies.len();
    let mut genre_stats: Vec<GenreStat> = genres
        .into_iter()
        .map(|g| GenreStat {
            average_rating: average(g.ratings.iter().map(|r| i64::from(*r)).sum(), g.ratings.len()),
            percentage: ((g.count as f64 / total as f64) * 100.0).round() as u32,
            count: g.count,
            genre: g.name,
        })
        .collect();
    genre_stats.sort_by(|a, b| b.count.cmp(&a.count));

    let rating_stats = RatingStats {
        average_rating: average(ratings.total_rating, ratings.rated),
        total_movies: total,
        highly_rated: ratings.highly_rated,
        medium_rated: ratings.medium_rated,
        low_rated: ratings.low_rated,
    };

    (genre_stats, rating_stats)
}

fn build_prompt(movies: &[WatchedMovie], genre_stats: &[GenreStat], stats: &RatingStats) -> String {
    let watched_list = movies
        .iter()
        .map(|m| match m.effective_rating() {
            Some(r) => format!("- {} ({}/5)", m.title, r),
            None => format!("- {} (not rated)", m.title),
        })
        .collect::<Vec<_>>()
        .join("\n");

    let genre_list = genre_stats
        .iter()
        .take(PROMPT_GENRE_LIMIT)
        .map(|g| {
            format!(
                "- {}: {} movies ({}%), average rating {:.1}",
                g.genre, g.count, g.percentage, g.average_rating
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyse my viewing habits.\n\n\
         Watched movies:\n{watched_list}\n\n\
         Top genres:\n{genre_list}\n\n\
         Ratings: average {:.1}, {} rated 4-5, {} rated 3, {} rated 1-2, {} movies in total.\n\n\
         Describe my taste in a short paragraph and suggest what I should watch next.",
        stats.average_rating,
        stats.highly_rated,
        stats.medium_rated,
        stats.low_rated,
        stats.total_movies,
    )
}

fn analysis_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "analysis": {
                "type": "string",
                "description": "Two or three paragraphs describing the viewer's taste"
            },
            "recommendations": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Three to five concrete viewing recommendations"
            }
        },
        "required": ["analysis", "recommendations"]
    })
}

fn cold_start_analysis() -> ViewingAnalysis {
    ViewingAnalysis {
        analysis: "You have not watched any movies yet. Mark movies as watched and rate them \
                   to get an analysis of your viewing habits."
            .to_string(),
        genre_stats: Vec::new(),
        rating_stats: RatingStats::default(),
        recommendations: vec![
            "Ask for a recommendation in a genre you already enjoy".to_string(),
            "Rate the movies you watch so your taste can be analysed".to_string(),
        ],
    }
}

fn fallback_recommendations() -> Vec<String> {
    vec!["Keep rating the movies you watch to get better recommendations".to_string()]
}

async fn run_analysis(store: &dyn MovieStore, ai: &dyn AiClient) -> AppResult<ViewingAnalysis> {
    let movies = store.list_watched().await?;

    if movies.is_empty() {
        tracing::info!("No watch history, returning encouragement");
        return Ok(cold_start_analysis());
    }

    let (genre_stats, rating_stats) = compute_statistics(&movies);

    tracing::info!(
        watched = rating_stats.total_movies,
        genres = genre_stats.len(),
        average_rating = rating_stats.average_rating,
        "Computed watch statistics"
    );

    let messages = vec![
        ChatMessage::system(
            "You are a film critic who studies a person's watch history and ratings. \
             Be specific, friendly and concise.",
        ),
        ChatMessage::user(build_prompt(&movies, &genre_stats, &rating_stats)),
    ];

    let object = ai.generate_object(messages, analysis_schema()).await?;

    let analysis = string_field(&object, "analysis").unwrap_or_else(|| {
        tracing::warn!("AI analysis missing, using fallback text");
        FALLBACK_ANALYSIS.to_string()
    });
    let recommendations =
        string_list_field(&object, "recommendations").unwrap_or_else(fallback_recommendations);

    Ok(ViewingAnalysis {
        analysis,
        genre_stats,
        rating_stats,
        recommendations,
    })
}

/// Statistics and an AI narrative over the whole watch history
pub async fn analyze_watched(
    store: &dyn MovieStore,
    ai: &dyn AiClient,
) -> AppResult<ViewingAnalysis> {
    run_analysis(store, ai).await.map_err(|e| {
        tracing::error!(error = %e, "Viewing analysis failed");
        AppError::Internal(format!("Failed to analyze watched movies: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::MockMovieStore, services::ai::MockAiClient};
    use chrono::Utc;
    use serde_json::Value;

    fn watched(movie_id: i64, title: &str, genres: &[&str], rating: Option<i32>) -> WatchedMovie {
        WatchedMovie {
            id: movie_id,
            movie_id,
            title: title.to_string(),
            poster: None,
            genres: Some(serde_json::to_string(genres).unwrap()),
            rating,
            created_at: Utc::now(),
        }
    }

    fn store_with(movies: Vec<WatchedMovie>) -> MockMovieStore {
        let mut store = MockMovieStore::new();
        store
            .expect_list_watched()
            .returning(move || Ok(movies.clone()));
        store
    }

    fn scenario() -> Vec<WatchedMovie> {
        vec![
            watched(1, "Matrix", &["Ação"], Some(5)),
            watched(2, "Velozes e Furiosos", &["Ação"], Some(3)),
            watched(3, "Clube da Luta", &["Drama"], None),
        ]
    }

    #[test]
    fn test_statistics_for_mixed_history() {
        let (genres, ratings) = compute_statistics(&scenario());

        assert_eq!(
            ratings,
            RatingStats {
                average_rating: 4.0,
                total_movies: 3,
                highly_rated: 1,
                medium_rated: 1,
                low_rated: 0,
            }
        );
        assert_eq!(
            genres,
            vec![
                GenreStat {
                    genre: "Ação".to_string(),
                    count: 2,
                    average_rating: 4.0,
                    percentage: 67,
                },
                GenreStat {
                    genre: "Drama".to_string(),
                    count: 1,
                    average_rating: 0.0,
                    percentage: 33,
                },
            ]
        );
    }

    #[test]
    fn test_rating_buckets_partition() {
        let movies: Vec<WatchedMovie> = [Some(5), Some(4), Some(3), Some(2), Some(1), None, Some(0)]
            .into_iter()
            .enumerate()
            .map(|(i, rating)| watched(i as i64, "Filme", &["Drama"], rating))
            .collect();

        let (genres, ratings) = compute_statistics(&movies);
        assert_eq!(ratings.highly_rated, 2);
        assert_eq!(ratings.medium_rated, 1);
        assert_eq!(ratings.low_rated, 2);
        assert_eq!(ratings.total_movies, 7);
        assert_eq!(ratings.average_rating, 3.0);
        assert_eq!(genres[0].count, 7);
        assert_eq!(genres[0].percentage, 100);
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        let movies = vec![
            watched(1, "A", &["Drama"], Some(5)),
            watched(2, "B", &["Drama"], Some(4)),
            watched(3, "C", &["Drama"], Some(4)),
        ];
        let (genres, ratings) = compute_statistics(&movies);
        assert_eq!(ratings.average_rating, 4.3);
        assert_eq!(genres[0].average_rating, 4.3);
    }

    #[test]
    fn test_genres_sorted_by_count() {
        let movies = vec![
            watched(1, "A", &["Terror"], None),
            watched(2, "B", &["Comédia", "Romance"], None),
            watched(3, "C", &["Comédia"], None),
        ];
        let (genres, _) = compute_statistics(&movies);
        let names: Vec<&str> = genres.iter().map(|g| g.genre.as_str()).collect();
        assert_eq!(names, vec!["Comédia", "Terror", "Romance"]);
    }

    #[test]
    fn test_prompt_limits_genres() {
        let movies = vec![watched(
            1,
            "Mistura",
            &["Ação", "Drama", "Comédia", "Terror", "Romance", "Guerra"],
            Some(4),
        )];
        let (genres, ratings) = compute_statistics(&movies);

        let prompt = build_prompt(&movies, &genres, &ratings);
        assert!(prompt.contains("- Mistura (4/5)"));
        assert!(prompt.contains("- Romance: 1 movies"));
        assert!(!prompt.contains("- Guerra:"));
    }

    #[tokio::test]
    async fn test_analysis_uses_ai_narrative() {
        let store = store_with(scenario());
        let mut ai = MockAiClient::new();
        ai.expect_generate_object()
            .withf(|messages, _schema| {
                messages.len() == 2
                    && messages[1].content.contains("- Matrix (5/5)")
                    && messages[1].content.contains("- Clube da Luta (not rated)")
            })
            .times(1)
            .returning(|_, _| {
                Ok(json!({
                    "analysis": "Você gosta de ação.",
                    "recommendations": ["John Wick", "Mad Max"]
                }))
            });

        let result = analyze_watched(&store, &ai).await.unwrap();
        assert_eq!(result.analysis, "Você gosta de ação.");
        assert_eq!(result.recommendations, vec!["John Wick", "Mad Max"]);
        assert_eq!(result.rating_stats.total_movies, 3);
        assert_eq!(result.genre_stats[0].percentage, 67);
    }

    #[tokio::test]
    async fn test_missing_ai_fields_fall_back() {
        let store = store_with(scenario());
        let mut ai = MockAiClient::new();
        ai.expect_generate_object()
            .returning(|_, _| Ok(Value::Null));

        let result = analyze_watched(&store, &ai).await.unwrap();
        assert_eq!(result.analysis, FALLBACK_ANALYSIS);
        assert_eq!(result.recommendations, fallback_recommendations());
        assert_eq!(result.rating_stats.average_rating, 4.0);
    }

    #[tokio::test]
    async fn test_cold_start_skips_ai() {
        let store = store_with(vec![]);
        let mut ai = MockAiClient::new();
        ai.expect_generate_object().never();

        let result = analyze_watched(&store, &ai).await.unwrap();
        assert!(result.genre_stats.is_empty());
        assert_eq!(result.rating_stats, RatingStats::default());
        assert_eq!(result.recommendations.len(), 2);
    }

    #[tokio::test]
    async fn test_ai_failure_is_generic_error() {
        let store = store_with(scenario());
        let mut ai = MockAiClient::new();
        ai.expect_generate_object()
            .returning(|_, _| Err(AppError::ExternalApi("AI service returned status 500".to_string())));

        let err = analyze_watched(&store, &ai).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_store_failure_is_generic_error() {
        let mut store = MockMovieStore::new();
        store
            .expect_list_watched()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        let ai = MockAiClient::new();

        let err = analyze_watched(&store, &ai).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
