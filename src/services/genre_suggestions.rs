//! Genre suggestions from watch history
//!
//! Watched movies are folded into per-genre tallies, ranked according to the
//! requested [`Preference`], and turned into three suggestions:
//!
//! - `comfort` suggests the best-rated genres the user already watches.
//! - `new` suggests catalogue genres that never appear in the history.
//!
//! Ranking treats averages within [`RATING_TIE_THRESHOLD`] of each other as
//! equal and breaks the tie on how often the genre was watched.

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{
    db::MovieStore,
    error::AppResult,
    models::{
        genre::resolve_genre_id, Genre, GenreSuggestion, Preference, SuggestedGenre, WatchedMovie,
    },
    services::tmdb::MetadataGateway,
};

/// Averages closer than this are ranked by watch count instead
pub const RATING_TIE_THRESHOLD: f64 = 0.5;

const SUGGESTION_COUNT: usize = 3;

const NEW_GENRE_REASON: &str = "different from your watched genres";

/// Aggregated history for one genre name
#[derive(Debug, Clone, PartialEq)]
pub struct GenreTally {
    pub name: String,
    pub id: i64,
    pub count: usize,
    pub total_rating: i64,
    /// `total_rating / count`; unrated movies count as zero
    pub average_rating: f64,
}

impl GenreTally {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: resolve_genre_id(name),
            count: 0,
            total_rating: 0,
            average_rating: 0.0,
        }
    }

    fn is_rated(&self) -> bool {
        self.total_rating > 0
    }
}

/// Folds watched movies into one tally per genre, in order of first appearance
pub fn tally_genres(movies: &[WatchedMovie]) -> Vec<GenreTally> {
    let mut tallies: Vec<GenreTally> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for movie in movies {
        let rating = i64::from(movie.effective_rating().unwrap_or(0));
        for genre in movie.genre_names() {
            let slot = *index.entry(genre.clone()).or_insert_with(|| {
                tallies.push(GenreTally::new(&genre));
                tallies.len() - 1
            });
            let tally = &mut tallies[slot];
            tally.count += 1;
            tally.total_rating += rating;
        }
    }

    for tally in &mut tallies {
        tally.average_rating = if tally.count > 0 {
            tally.total_rating as f64 / tally.count as f64
        } else {
            0.0
        };
    }

    tallies
}

/// Whether `candidate` beats `current` once their averages are considered tied
fn wins_tie(candidate: &GenreTally, current: &GenreTally, preference: Preference) -> bool {
    match preference {
        Preference::Comfort => {
            candidate.count > current.count
                || (candidate.count == current.count
                    && candidate.average_rating > current.average_rating)
        }
        Preference::New => {
            candidate.count < current.count
                || (candidate.count == current.count
                    && candidate.average_rating < current.average_rating)
        }
    }
}

/// Orders tallies for the given preference.
///
/// The threshold relation is not transitive, so instead of a comparator sort
/// this repeatedly takes the extreme remaining average and emits, among the
/// genres within the threshold of it, the one that wins on count. For
/// `Comfort` no emitted genre is ever followed by one rated more than the
/// threshold above it (mirrored for `New`).
pub fn rank_genres(mut remaining: Vec<GenreTally>, preference: Preference) -> Vec<GenreTally> {
    let mut ranked = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let averages = remaining.iter().map(|t| t.average_rating);
        let anchor = match preference {
            Preference::Comfort => averages.fold(f64::MIN, f64::max),
            Preference::New => averages.fold(f64::MAX, f64::min),
        };

        let mut best: Option<usize> = None;
        for (i, tally) in remaining.iter().enumerate() {
            if (tally.average_rating - anchor).abs() > RATING_TIE_THRESHOLD {
                continue;
            }
            best = match best {
                Some(b) if !wins_tie(tally, &remaining[b], preference) => Some(b),
                _ => Some(i),
            };
        }

        let Some(pick) = best else { break };
        ranked.push(remaining.remove(pick));
    }

    ranked
}

/// Suggestion returned when there is no history to personalize from
fn cold_start_suggestion() -> GenreSuggestion {
    let popular = [(28, "Ação"), (35, "Comédia"), (18, "Drama")];

    GenreSuggestion {
        suggested_genres: popular
            .iter()
            .map(|(id, name)| SuggestedGenre {
                id: *id,
                name: name.to_string(),
                reason: "Popular genre, suggested because you have no watch history yet"
                    .to_string(),
            })
            .collect(),
        analysis: "You have not marked any movies as watched yet, so these are popular genres \
                   to get started."
            .to_string(),
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "movie"
    } else {
        "movies"
    }
}

fn comfort_suggestion(ranked: &[GenreTally], watched_count: usize) -> GenreSuggestion {
    if ranked.is_empty() {
        return GenreSuggestion {
            suggested_genres: Vec::new(),
            analysis: format!(
                "None of your {} watched {} has genre information, so no comfort genres \
                 could be identified.",
                watched_count,
                plural(watched_count)
            ),
        };
    }

    let top: Vec<&GenreTally> = ranked.iter().take(SUGGESTION_COUNT).collect();

    let suggested_genres = top
        .iter()
        .map(|tally| {
            let reason = if tally.is_rated() {
                format!(
                    "You watched {} {} of this genre with an average rating of {:.1}",
                    tally.count,
                    plural(tally.count),
                    tally.average_rating
                )
            } else {
                format!(
                    "You watched {} {} of this genre",
                    tally.count,
                    plural(tally.count)
                )
            };
            SuggestedGenre {
                id: tally.id,
                name: tally.name.clone(),
                reason,
            }
        })
        .collect();

    let names: Vec<&str> = top.iter().map(|t| t.name.as_str()).collect();

    GenreSuggestion {
        suggested_genres,
        analysis: format!(
            "Based on your {} watched {}, your comfort genres are {}.",
            watched_count,
            plural(watched_count),
            names.join(", ")
        ),
    }
}

/// Shuffles the catalogue genres absent from the history and keeps the first few
fn pick_unexplored<R: Rng + ?Sized>(
    catalogue: Vec<Genre>,
    watched: &[GenreTally],
    rng: &mut R,
) -> Vec<Genre> {
    let seen: HashSet<String> = watched.iter().map(|t| t.name.to_lowercase()).collect();

    let mut unexplored: Vec<Genre> = catalogue
        .into_iter()
        .filter(|genre| !seen.contains(&genre.name.to_lowercase()))
        .collect();

    unexplored.shuffle(rng);
    unexplored.truncate(SUGGESTION_COUNT);
    unexplored
}

fn new_suggestion(picks: Vec<Genre>, ranked: &[GenreTally]) -> GenreSuggestion {
    let analysis = if picks.is_empty() {
        "You have already explored every genre in the catalogue.".to_string()
    } else {
        let mut text = format!(
            "You have explored {} {} so far. These genres are outside your watch history.",
            ranked.len(),
            if ranked.len() == 1 { "genre" } else { "genres" }
        );
        if let Some(least) = ranked.first() {
            text.push_str(&format!(
                " Of the genres you know, {} is the one you enjoyed least.",
                least.name
            ));
        }
        text
    };

    GenreSuggestion {
        suggested_genres: picks
            .into_iter()
            .map(|genre| SuggestedGenre {
                id: genre.id,
                name: genre.name,
                reason: NEW_GENRE_REASON.to_string(),
            })
            .collect(),
        analysis,
    }
}

/// Suggests genres from the watch history according to `preference`
pub async fn suggest_genres(
    store: &dyn MovieStore,
    gateway: &dyn MetadataGateway,
    preference: Preference,
) -> AppResult<GenreSuggestion> {
    let movies = store.list_watched().await?;

    if movies.is_empty() {
        tracing::info!(preference = ?preference, "No watch history, returning popular genres");
        return Ok(cold_start_suggestion());
    }

    let tallies = tally_genres(&movies);
    let ranked = rank_genres(tallies, preference);

    tracing::info!(
        watched = movies.len(),
        genres = ranked.len(),
        preference = ?preference,
        "Ranked watched genres"
    );

    match preference {
        Preference::Comfort => Ok(comfort_suggestion(&ranked, movies.len())),
        Preference::New => {
            let catalogue = gateway.list_genres().await?;
            let picks = pick_unexplored(catalogue, &ranked, &mut rand::thread_rng());
            Ok(new_suggestion(picks, &ranked))
        }
    }
}
