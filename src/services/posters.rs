use std::sync::Arc;

use crate::services::providers::PosterProvider;

/// Shown when no poster API key is configured
pub const NO_API_KEY_PLACEHOLDER: &str =
    "https://via.placeholder.com/500x750/cccccc/666666?text=No+API+Key";

/// Shown when a poster can't be resolved for any other reason
pub const NO_IMAGE_PLACEHOLDER: &str =
    "https://via.placeholder.com/500x750/cccccc/666666?text=No+Image";

/// Resolves poster URLs, substituting a placeholder for anything that fails.
///
/// Nothing here returns an error: one bad lookup costs one card its image, not
/// the whole recommendation list.
#[derive(Clone)]
pub struct PosterService {
    provider: Arc<dyn PosterProvider>,
}

impl PosterService {
    pub fn new(provider: Arc<dyn PosterProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Poster URL for one movie, or a placeholder
    pub async fn poster_url(&self, movie_id: i64) -> String {
        Self::resolve(self.provider.as_ref(), movie_id).await
    }

    /// Poster URLs for several movies, fetched concurrently, in input order
    pub async fn poster_urls(&self, movie_ids: &[i64]) -> Vec<String> {
        if !self.provider.is_configured() {
            tracing::warn!(
                provider = self.provider.name(),
                "Poster API key not configured, using placeholders"
            );
            return vec![NO_API_KEY_PLACEHOLDER.to_string(); movie_ids.len()];
        }

        let tasks: Vec<_> = movie_ids
            .iter()
            .map(|&movie_id| {
                let provider = Arc::clone(&self.provider);
                tokio::spawn(async move { Self::resolve(provider.as_ref(), movie_id).await })
            })
            .collect();

        let mut urls = Vec::with_capacity(tasks.len());
        for (task, movie_id) in tasks.into_iter().zip(movie_ids) {
            match task.await {
                Ok(url) => urls.push(url),
                Err(e) => {
                    tracing::error!(error = %e, movie_id = *movie_id, "Poster task join error");
                    urls.push(NO_IMAGE_PLACEHOLDER.to_string());
                }
            }
        }

        urls
    }

    async fn resolve(provider: &dyn PosterProvider, movie_id: i64) -> String {
        if !provider.is_configured() {
            tracing::warn!(movie_id, provider = provider.name(), "Poster API key not configured");
            return NO_API_KEY_PLACEHOLDER.to_string();
        }

        match provider.fetch_poster(movie_id).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    movie_id,
                    provider = provider.name(),
                    "Could not fetch poster"
                );
                NO_IMAGE_PLACEHOLDER.to_string()
            }
        }
    }
}
