use rand::Rng;

use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{BestEffort, MovieEntry, MovieSummary, RecommendRequest, Recommendation},
    services::tmdb::MetadataGateway,
};

/// Most genres a recommendation request may include
pub const MAX_INCLUDED_GENRES: usize = 3;

fn validate(request: &RecommendRequest) -> AppResult<()> {
    let count = request.include_genre_ids.len();
    if count == 0 || count > MAX_INCLUDED_GENRES {
        return Err(AppError::InvalidInput(format!(
            "Select between 1 and {} genres, got {}",
            MAX_INCLUDED_GENRES, count
        )));
    }
    Ok(())
}

/// Uniformly random element of a discovery page
fn pick_movie<R: Rng + ?Sized>(mut movies: Vec<MovieSummary>, rng: &mut R) -> Option<MovieSummary> {
    if movies.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..movies.len());
    Some(movies.swap_remove(index))
}

/// Picks a random movie for the requested genres and enriches it
///
/// Discovery failures and an empty page abort the request. Genre, trailer and
/// provider lookups and the write to the recommendation log are best-effort:
/// each failure is logged and recorded on the returned [`Recommendation`].
#[tracing::instrument(skip(store, gateway), fields(include = ?request.include_genre_ids))]
pub async fn recommend_movie(
    store: &dyn MovieStore,
    gateway: &dyn MetadataGateway,
    request: &RecommendRequest,
) -> AppResult<Recommendation> {
    validate(request)?;

    let page = gateway
        .discover(&request.include_genre_ids, request.excluded())
        .await?;
    let candidates = page.len();

    let movie = pick_movie(page, &mut rand::thread_rng()).ok_or_else(|| {
        AppError::NotFound("No movies found for the selected genres".to_string())
    })?;

    tracing::info!(
        movie_id = movie.id,
        title = %movie.title,
        candidates,
        "Selected movie"
    );

    let genres = BestEffort::capture(gateway.movie_genres(movie.id).await, "movie_genres");
    let videos = BestEffort::capture(gateway.movie_videos(movie.id).await, "movie_videos");
    let watch_providers =
        BestEffort::capture(gateway.watch_providers(movie.id).await, "watch_providers");

    let entry = MovieEntry {
        movie_id: movie.id,
        title: movie.title.clone(),
        poster: Some(movie.poster_url.clone()),
        genres: match &genres {
            BestEffort::Done(names) if !names.is_empty() => Some(names.clone()),
            _ => None,
        },
    };
    let logged = BestEffort::capture(store.insert_recommended(&entry).await, "log_recommendation");

    Ok(Recommendation {
        movie_id: movie.id,
        title: movie.title,
        overview: movie.overview,
        poster_url: movie.poster_url,
        genres,
        videos,
        watch_providers,
        logged,
    })
}
