/// Read-through caching over a `dyn CacheStore`.
///
/// Returns the cached value when present. Otherwise awaits `$block`, queues
/// the result for a background write and returns it. A failed cache read is
/// logged and treated as a miss; errors from `$block` propagate with `?`.
///
/// # Arguments
/// * `$cache`: anything that derefs to `dyn CacheStore`.
/// * `$key`: the `CacheKey` to read and write.
/// * `$ttl`: time-to-live in seconds for the written value.
/// * `$block`: a future resolving to `AppResult<T>`.
///
/// # Example
/// ```rust,ignore
/// let feed = cached!(cache, CacheKey::FeedRanking(user_id), 300, async {
///     Ok::<_, AppError>(compute_feed())
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => Ok(cached),
            lookup => {
                if let Err(e) = lookup {
                    ::tracing::warn!(error = %e, key = %$key, "Cache read failed, recomputing");
                }
                let value = $block.await?;
                $cache.set_in_background(&$key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
