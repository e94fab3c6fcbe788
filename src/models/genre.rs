use serde::{Deserialize, Serialize};

/// A movie genre as defined by TMDB
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

impl Genre {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Genre id used for names missing from the lookup table (Drama)
pub const FALLBACK_GENRE_ID: i64 = 18;

/// Maps a pt-BR TMDB genre name to its TMDB id. Exact match only.
pub fn known_genre_id(name: &str) -> Option<i64> {
    let id = match name {
        "Ação" => 28,
        "Aventura" => 12,
        "Animação" => 16,
        "Comédia" => 35,
        "Crime" => 80,
        "Documentário" => 99,
        "Drama" => 18,
        "Família" => 10751,
        "Fantasia" => 14,
        "História" => 36,
        "Terror" => 27,
        "Música" => 10402,
        "Mistério" => 9648,
        "Romance" => 10749,
        "Ficção científica" => 878,
        "Cinema TV" => 10770,
        "Thriller" => 53,
        "Guerra" => 10752,
        "Faroeste" => 37,
        _ => return None,
    };
    Some(id)
}

/// Resolves a genre name to an id, falling back to [`FALLBACK_GENRE_ID`]
pub fn resolve_genre_id(name: &str) -> i64 {
    known_genre_id(name).unwrap_or(FALLBACK_GENRE_ID)
}

/// Strategy used when suggesting genres
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    /// Favour genres the user already rates highly
    Comfort,
    /// Favour genres absent from the watch history
    New,
}

/// A single suggested genre with a human-readable justification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestedGenre {
    pub id: i64,
    pub name: String,
    pub reason: String,
}

/// Response of the genre suggestion engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenreSuggestion {
    pub suggested_genres: Vec<SuggestedGenre>,
    pub analysis: String,
}
