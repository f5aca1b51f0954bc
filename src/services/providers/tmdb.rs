/// TMDB poster provider
///
/// Looks a movie up by its TMDB ID and joins the returned `poster_path` onto the
/// image CDN base URL.
///
/// API Flow:
/// 1. Details: /movie/{movie_id}?api_key=..&language=en-US → `poster_path`
/// 2. Image:   {poster_base_url}{poster_path}
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    services::providers::PosterProvider,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;

const POSTER_CACHE_TTL: u64 = 604800; // 1 week
const LANGUAGE: &str = "en-US";

/// The subset of TMDB's movie details response we read
#[derive(Debug, Deserialize)]
struct TmdbMovie {
    #[serde(default)]
    poster_path: Option<String>,
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    poster_base_url: String,
    cache: Option<Cache>,
}

impl TmdbProvider {
    pub fn new(
        api_key: Option<String>,
        api_url: String,
        poster_base_url: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            poster_base_url,
            cache: None,
        })
    }

    /// Caches resolved poster URLs in Redis
    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Joins a TMDB poster path onto the image base URL
    fn poster_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}",
            self.poster_base_url.trim_end_matches('/'),
            poster_path.trim_start_matches('/')
        )
    }

    async fn request_poster(&self, api_key: &str, movie_id: i64) -> AppResult<String> {
        let url = format!("{}/movie/{}", self.api_url, movie_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key), ("language", LANGUAGE)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::PosterFetch(format!(
                "TMDB API returned status {} for movie {}",
                status, movie_id
            )));
        }

        let body = response.text().await?;
        let movie: TmdbMovie = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(error = %e, response = %body, "Failed to deserialize TMDB response");
            AppError::PosterFetch(format!("Failed to parse TMDB response: {}", e))
        })?;

        let poster_path = movie
            .poster_path
            .filter(|path| !path.trim().is_empty())
            .ok_or_else(|| {
                AppError::PosterFetch(format!("TMDB has no poster_path for movie {}", movie_id))
            })?;

        let poster_url = self.poster_url(&poster_path);

        tracing::debug!(
            movie_id = movie_id,
            poster_url = %poster_url,
            provider = "tmdb",
            "Poster fetched"
        );

        Ok(poster_url)
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbProvider {
    async fn fetch_poster(&self, movie_id: i64) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::PosterFetch("TMDB API key not configured".to_string()))?;

        match &self.cache {
            Some(cache) => cached!(
                cache,
                CacheKey::Poster(movie_id),
                POSTER_CACHE_TTL,
                self.request_poster(api_key, movie_id)
            ),
            None => self.request_poster(api_key, movie_id).await,
        }
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
