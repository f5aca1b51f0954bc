use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinematch::{
    config::Config,
    db::{create_redis_client, Cache, CacheWriterHandle, Catalog},
    error::AppError,
    routes::{create_router, AppState},
    services::{providers::TmdbProvider, PosterService, Recommender},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinematch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = load_catalog(&config).await?;

    let (cache, cache_handle) = match &config.redis_url {
        Some(url) => {
            let (cache, handle) = Cache::new(create_redis_client(url)?);
            tracing::info!("Poster cache enabled");
            (Some(cache), Some(handle))
        }
        None => (None, None),
    };

    let mut provider = TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.poster_base_url.clone(),
        Duration::from_secs(config.poster_timeout_secs),
    )?;
    if let Some(cache) = cache {
        provider = provider.with_cache(cache);
    }
    if config.tmdb_api_key.is_none() {
        tracing::warn!("TMDB_API_KEY not set, posters will use a placeholder image");
    }

    let state = Arc::new(AppState::new(
        Recommender::new(catalog, config.recommendation_count),
        PosterService::new(Arc::new(provider)),
    ));

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    tracing::info!(address = %config.bind_addr(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_cache(cache_handle).await;

    Ok(())
}

/// Loads the movie table and similarity matrix off the async runtime
async fn load_catalog(config: &Config) -> anyhow::Result<Arc<Catalog>> {
    let movies_path = config.movies_path.clone();
    let similarity_path = config.similarity_path.clone();

    let loaded = tokio::task::spawn_blocking(move || Catalog::load(&movies_path, &similarity_path))
        .await
        .context("Catalog loading task failed")?;

    match loaded {
        Ok(catalog) => Ok(Arc::new(catalog)),
        Err(e @ AppError::DataLoad { .. }) => {
            tracing::error!(
                error = %e,
                movies_path = %config.movies_path,
                similarity_path = %config.similarity_path,
                "Required data files are missing or unreadable. Provide the movie table \
                 (MOVIES_PATH) and the similarity matrix (SIMILARITY_PATH)"
            );
            Err(e).context("Failed to load movie data")
        }
        Err(e) => Err(e.into()),
    }
}

async fn shutdown_cache(handle: Option<CacheWriterHandle>) {
    if let Some(handle) = handle {
        handle.shutdown().await;
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
