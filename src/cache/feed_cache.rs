use redis::{aio::ConnectionManager, AsyncCommands};
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::error::{AppError, Result};
use crate::metrics::feed::{FEED_CACHE_EVENTS, FEED_CACHE_WRITE_TOTAL};
use crate::models::FeedPage;

/// Global feed page cache backed by Redis.
///
/// Only the first `cached_pages` pages are cached; deeper pages always
/// recompute. Invalidation deletes the whole key set, so a mutation is
/// visible on the next uncached read.
#[derive(Clone)]
pub struct FeedCache {
    redis: ConnectionManager,
    default_ttl: Duration,
    cached_pages: i64,
}

impl FeedCache {
    pub fn new(redis: ConnectionManager, default_ttl_secs: u64, cached_pages: i64) -> Self {
        Self {
            redis,
            default_ttl: Duration::from_secs(default_ttl_secs),
            cached_pages: cached_pages.max(1),
        }
    }

    fn page_key(page: i64) -> String {
        format!("feed:global:v1:p{}", page)
    }

    /// Whether a requested page falls inside the cached range.
    pub fn covers_page(&self, page: i64) -> bool {
        page >= 1 && page <= self.cached_pages
    }

    pub async fn read_page(&self, page: i64) -> Result<Option<FeedPage>> {
        let key = Self::page_key(page);
        let mut conn = self.redis.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(data)) => {
                debug!("Feed cache HIT for page {}", page);
                FEED_CACHE_EVENTS.with_label_values(&["hit"]).inc();
                serde_json::from_str::<FeedPage>(&data).map(Some).map_err(|e| {
                    error!("Failed to deserialize cached feed page: {}", e);
                    FEED_CACHE_EVENTS.with_label_values(&["error"]).inc();
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })
            }
            Ok(None) => {
                debug!("Feed cache MISS for page {}", page);
                FEED_CACHE_EVENTS.with_label_values(&["miss"]).inc();
                Ok(None)
            }
            Err(e) => {
                warn!("Redis read error for feed cache: {}", e);
                FEED_CACHE_EVENTS.with_label_values(&["error"]).inc();
                Err(AppError::CacheError(e.to_string()))
            }
        }
    }

    pub async fn write_page(&self, page: i64, feed: &FeedPage) -> Result<()> {
        let key = Self::page_key(page);

        let data = serde_json::to_string(feed).map_err(|e| {
            error!("Failed to serialize feed page for cache: {}", e);
            AppError::Internal(format!("Cache serialization error: {}", e))
        })?;

        // Jitter the TTL so cached pages do not all expire on the same tick.
        let jitter = (rand::random::<u32>() % 10) as f64 / 100.0;
        let jitter_secs = (self.default_ttl.as_secs_f64() * jitter).round() as u64;
        let final_ttl = self.default_ttl + Duration::from_secs(jitter_secs);

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(&key, data, final_ttl.as_secs())
            .await
            .map_err(|e| {
                warn!("Failed to write feed cache: {}", e);
                FEED_CACHE_WRITE_TOTAL.with_label_values(&["error"]).inc();
                AppError::CacheError(e.to_string())
            })?;

        debug!(
            "Feed cache WRITE for page {} ({} posts) with TTL {:?}",
            page,
            feed.posts.len(),
            final_ttl
        );

        FEED_CACHE_WRITE_TOTAL.with_label_values(&["success"]).inc();

        Ok(())
    }

    /// Drop every cached global feed page. Called after any post mutation so
    /// the next read recomputes.
    pub async fn invalidate_global(&self) -> Result<()> {
        let keys: Vec<String> = (1..=self.cached_pages).map(Self::page_key).collect();

        let mut conn = self.redis.clone();
        conn.del::<_, ()>(keys)
            .await
            .map_err(|e| AppError::CacheError(e.to_string()))?;

        debug!("Feed cache INVALIDATE (global, {} pages)", self.cached_pages);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_key_format() {
        assert_eq!(FeedCache::page_key(1), "feed:global:v1:p1");
        assert_eq!(FeedCache::page_key(4), "feed:global:v1:p4");
    }
}
