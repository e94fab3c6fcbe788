//! Business operations behind the HTTP handlers
//!
//! Each operation is a free async function over the [`MovieStore`](crate::db::MovieStore),
//! [`MetadataGateway`](tmdb::MetadataGateway) and [`AiClient`](ai::AiClient) seams,
//! so handlers and tests can supply any implementation.

pub mod ai;
pub mod credentials;
pub mod genre_suggestions;
pub mod recommendations;
pub mod reviews;
pub mod tmdb;
pub mod viewing_analysis;
pub mod watch_history;
