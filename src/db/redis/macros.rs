/// Read-through caching for an async computation.
///
/// Returns the cached value for `$key` when present. Otherwise awaits `$block`,
/// queues the result for a background write with `$ttl` seconds to live, and
/// returns it. A failed cache read is logged and treated as a miss. Errors from
/// `$block` propagate with `?` and nothing is cached.
///
/// # Example
/// ```rust,ignore
/// let url: String = cached!(cache, CacheKey::Poster(movie_id), POSTER_CACHE_TTL, async move {
///     request_poster(movie_id).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => Ok(cached),
            lookup => {
                if let Err(e) = lookup {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                }
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
