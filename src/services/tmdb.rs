//! TMDB metadata gateway
//!
//! All movie metadata (genres, discovery, details, videos, watch providers and
//! reviews) comes from TMDB API v3. The credential is not part of the process
//! configuration: it is stored in the row store and resolved on every call.
//!
//! Two authentication modes are supported, chosen by the stored key's shape:
//! v4 read tokens (JWTs, always starting with `eyJ`) go in an `Authorization:
//! Bearer` header, v3 keys go in the `api_key` query parameter.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    db::MovieStore,
    error::{AppError, AppResult},
    models::{
        ApiDiscoverPage, ApiGenreList, ApiMovieDetail, ApiMovieSummary, ApiProvider,
        ApiRegionProviders, ApiReview, ApiReviewPage, ApiVideoList, ApiWatchProviderResults,
        Genre, MovieSummary, MovieVideo, WatchProvider, WatchProviders,
    },
};

/// Streaming services a discovered movie must be available on
const WATCH_PROVIDER_IDS: &[u32] = &[8, 119, 9, 220, 350, 2, 3, 15, 192, 531, 7, 97, 384];

const POSTER_SIZE: &str = "w500";
const LOGO_SIZE: &str = "original";

/// How a request authenticates against TMDB
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmdbCredential {
    /// v4 read access token
    Bearer(String),
    /// v3 API key
    ApiKey(String),
}

impl TmdbCredential {
    pub fn from_stored(key: String) -> Self {
        if key.starts_with("eyJ") {
            TmdbCredential::Bearer(key)
        } else {
            TmdbCredential::ApiKey(key)
        }
    }
}

/// Read-only access to movie metadata
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataGateway: Send + Sync {
    /// Official movie genre catalogue
    async fn list_genres(&self) -> AppResult<Vec<Genre>>;

    /// One page of popular movies having all `include` genres and none of `exclude`
    async fn discover(&self, include: &[i64], exclude: &[i64]) -> AppResult<Vec<MovieSummary>>;

    /// Genre names of a single movie
    async fn movie_genres(&self, movie_id: i64) -> AppResult<Vec<String>>;

    /// YouTube trailers of a single movie
    async fn movie_videos(&self, movie_id: i64) -> AppResult<Vec<MovieVideo>>;

    /// Providers in the configured region, `None` if TMDB lists none there
    async fn watch_providers(&self, movie_id: i64) -> AppResult<Option<WatchProviders>>;

    /// First page of user reviews
    async fn movie_reviews(&self, movie_id: i64) -> AppResult<Vec<ApiReview>>;
}

/// [`MetadataGateway`] talking to the TMDB HTTP API
#[derive(Clone)]
pub struct TmdbGateway {
    http_client: HttpClient,
    api_url: String,
    image_url: String,
    language: String,
    region: String,
    store: Arc<dyn MovieStore>,
}

impl TmdbGateway {
    pub fn new(config: &Config, store: Arc<dyn MovieStore>) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_url: config.tmdb_api_url.trim_end_matches('/').to_string(),
            image_url: config.tmdb_image_url.trim_end_matches('/').to_string(),
            language: config.tmdb_language.clone(),
            region: config.watch_region.clone(),
            store,
        })
    }

    async fn credential(&self) -> AppResult<TmdbCredential> {
        self.store
            .tmdb_api_key()
            .await?
            .filter(|key| !key.trim().is_empty())
            .map(TmdbCredential::from_stored)
            .ok_or_else(|| {
                AppError::Configuration(
                    "TMDB API key not configured. Set it with PUT /api/v1/credentials/tmdb"
                        .to_string(),
                )
            })
    }

    /// Issues an authenticated GET and decodes the JSON body
    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> AppResult<T> {
        let credential = self.credential().await?;
        let url = format!("{}{}", self.api_url, path);

        tracing::debug!(url = %url, "TMDB request");

        let mut request = self.http_client.get(&url).query(params);
        request = match &credential {
            TmdbCredential::Bearer(token) => request.bearer_auth(token),
            TmdbCredential::ApiKey(key) => request.query(&[("api_key", key.as_str())]),
        };

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    fn language_param(&self) -> (&'static str, String) {
        ("language", self.language.clone())
    }

    fn summary_from_api(&self, movie: ApiMovieSummary) -> MovieSummary {
        MovieSummary {
            id: movie.id,
            title: movie.title,
            overview: movie.overview,
            poster_url: image_url(&self.image_url, POSTER_SIZE, movie.poster_path.as_deref())
                .unwrap_or_default(),
        }
    }
}

/// Absolute image URL for a TMDB-relative path
fn image_url(base: &str, size: &str, path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}/{}{}", base, size, p))
}

fn convert_providers(region: ApiRegionProviders, image_base: &str) -> WatchProviders {
    let convert = |providers: Option<Vec<ApiProvider>>| -> Vec<WatchProvider> {
        providers
            .unwrap_or_default()
            .into_iter()
            .map(|p| WatchProvider {
                logo_path: image_url(image_base, LOGO_SIZE, p.logo_path.as_deref()),
                provider_name: p.provider_name,
            })
            .collect()
    };

    WatchProviders {
        flatrate: convert(region.flatrate),
        rent: convert(region.rent),
        buy: convert(region.buy),
    }
}

fn join_ids<T: ToString>(ids: &[T], separator: &str) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

#[async_trait::async_trait]
impl MetadataGateway for TmdbGateway {
    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let list: ApiGenreList = self
            .get("/genre/movie/list", &[self.language_param()])
            .await?;

        tracing::info!(genres = list.genres.len(), "Genre catalogue fetched");

        Ok(list.genres)
    }

    async fn discover(&self, include: &[i64], exclude: &[i64]) -> AppResult<Vec<MovieSummary>> {
        let mut params = vec![
            ("sort_by", "popularity.desc".to_string()),
            self.language_param(),
            ("include_video", "true".to_string()),
            ("with_watch_providers", join_ids(WATCH_PROVIDER_IDS, "|")),
        ];
        if !include.is_empty() {
            params.push(("with_genres", join_ids(include, ",")));
        }
        if !exclude.is_empty() {
            params.push(("without_genres", join_ids(exclude, ",")));
        }

        let page: ApiDiscoverPage = self.get("/discover/movie", &params).await?;

        tracing::info!(
            include = ?include,
            exclude = ?exclude,
            results = page.results.len(),
            "Discovery page fetched"
        );

        Ok(page
            .results
            .into_iter()
            .map(|movie| self.summary_from_api(movie))
            .collect())
    }

    async fn movie_genres(&self, movie_id: i64) -> AppResult<Vec<String>> {
        let detail: ApiMovieDetail = self
            .get(&format!("/movie/{}", movie_id), &[self.language_param()])
            .await?;
        Ok(detail.genres.into_iter().map(|g| g.name).collect())
    }

    async fn movie_videos(&self, movie_id: i64) -> AppResult<Vec<MovieVideo>> {
        let videos: ApiVideoList = self
            .get(&format!("/movie/{}/videos", movie_id), &[self.language_param()])
            .await?;
        Ok(videos
            .results
            .into_iter()
            .filter(MovieVideo::is_youtube_trailer)
            .collect())
    }

    async fn watch_providers(&self, movie_id: i64) -> AppResult<Option<WatchProviders>> {
        let mut providers: ApiWatchProviderResults = self
            .get(&format!("/movie/{}/watch/providers", movie_id), &[])
            .await?;

        let region = providers.results.remove(&self.region);
        if region.is_none() {
            tracing::debug!(movie_id = movie_id, region = %self.region, "No providers listed for region");
        }

        Ok(region.map(|r| convert_providers(r, &self.image_url)))
    }

    async fn movie_reviews(&self, movie_id: i64) -> AppResult<Vec<ApiReview>> {
        let page: ApiReviewPage = self
            .get(
                &format!("/movie/{}/reviews", movie_id),
                &[self.language_param(), ("page", "1".to_string())],
            )
            .await?;
        Ok(page.results)
    }
}
