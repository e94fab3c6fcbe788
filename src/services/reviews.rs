use serde_json::json;

use crate::{
    error::AppResult,
    models::{ApiReview, ReviewSummary},
    services::{
        ai::{string_field, string_list_field, AiClient, ChatMessage},
        tmdb::MetadataGateway,
    },
};

/// Reviews sent to the AI service per summary
pub const REVIEW_LIMIT: usize = 10;

pub const SENTIMENTS: [&str; 4] = ["positivo", "negativo", "misto", "neutro"];
const NEUTRAL: &str = "neutro";

fn fallback_key_points() -> Vec<String> {
    vec!["Analysis not available".to_string()]
}

fn no_reviews_summary() -> ReviewSummary {
    ReviewSummary {
        summary: "This movie has no reviews yet.".to_string(),
        sentiment: NEUTRAL.to_string(),
        key_points: vec!["No reviews available".to_string()],
    }
}

fn build_prompt(movie_id: i64, reviews: &[ApiReview]) -> String {
    let body = reviews
        .iter()
        .take(REVIEW_LIMIT)
        .map(|r| format!("{}: {}", r.author, r.content.trim()))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Summarize these reviews of movie {}. Classify the overall sentiment as one of {} \
         and list the main points reviewers agree on.\n\n{}",
        movie_id,
        SENTIMENTS.join(", "),
        body
    )
}

fn summary_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "summary": { "type": "string" },
            "sentiment": { "type": "string", "enum": SENTIMENTS },
            "keyPoints": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["summary", "sentiment", "keyPoints"]
    })
}

/// Summarizes the first page of a movie's reviews
#[tracing::instrument(skip(gateway, ai))]
pub async fn summarize_reviews(
    gateway: &dyn MetadataGateway,
    ai: &dyn AiClient,
    movie_id: i64,
) -> AppResult<ReviewSummary> {
    let reviews = gateway.movie_reviews(movie_id).await?;
    if reviews.is_empty() {
        tracing::info!(movie_id, "No reviews to summarize");
        return Ok(no_reviews_summary());
    }

    tracing::info!(
        movie_id,
        reviews = reviews.len(),
        sent = reviews.len().min(REVIEW_LIMIT),
        "Summarizing reviews"
    );

    let messages = vec![
        ChatMessage::system("You summarize movie reviews for a Brazilian audience. Answer in Portuguese."),
        ChatMessage::user(build_prompt(movie_id, &reviews)),
    ];
    let object = ai.generate_object(messages, summary_schema()).await?;

    let sentiment = string_field(&object, "sentiment")
        .map(|s| s.to_lowercase())
        .filter(|s| SENTIMENTS.contains(&s.as_str()))
        .unwrap_or_else(|| NEUTRAL.to_string());

    Ok(ReviewSummary {
        summary: string_field(&object, "summary")
            .unwrap_or_else(|| "Could not summarize the reviews for this movie.".to_string()),
        sentiment,
        key_points: string_list_field(&object, "keyPoints").unwrap_or_else(fallback_key_points),
    })
}
