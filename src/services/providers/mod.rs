use crate::error::AppResult;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Poster image provider abstraction
///
/// Resolves a movie's numeric metadata ID to a poster image URL. Implementations
/// report failures as errors; turning those into placeholder images is the
/// caller's job (see `services::posters::PosterService`).
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Fetch the poster URL for a movie
    async fn fetch_poster(&self, movie_id: i64) -> AppResult<String>;

    /// Whether the provider has the credentials it needs to make requests
    fn is_configured(&self) -> bool;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
