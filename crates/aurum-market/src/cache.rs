//! TTL caches for provider data used by the live runner

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use cached::{Cached, TimedCache};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::analysis::{DebtSnapshot, PriceSeries};
use crate::ingest::RawRecord;

/// Cache key for a provider request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Provider or adapter name
    pub source: String,
    /// Operation, e.g. "news" or "daily"
    pub operation: String,
    /// Additional parameters as a JSON string
    pub params: String,
}

impl CacheKey {
    pub fn new(source: impl Into<String>, operation: impl Into<String>, params: impl Serialize) -> Self {
        Self {
            source: source.into(),
            operation: operation.into(),
            params: serde_json::to_string(&params).unwrap_or_default(),
        }
    }
}

/// Thread-safe TTL cache of fetched values
pub struct FetchCache<V> {
    cache: Arc<RwLock<TimedCache<CacheKey, V>>>,
}

impl<V: Clone> FetchCache<V> {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        // TimedCache evicts expired entries on read, so reads need the write lock
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    pub async fn insert(&self, key: CacheKey, value: V) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Return the cached value, or run `fetcher` and cache its success
    pub async fn get_or_fetch<F, Fut, E>(&self, key: CacheKey, fetcher: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!(source = %key.source, operation = %key.operation, "Cache hit");
            return Ok(value);
        }

        tracing::debug!(source = %key.source, operation = %key.operation, "Cache miss");

        let value = fetcher().await?;
        self.insert(key, value.clone()).await;

        Ok(value)
    }

    pub async fn invalidate(&self, key: &CacheKey) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(key);
    }

    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<V> Clone for FetchCache<V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<V> Debug for FetchCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCache").finish_non_exhaustive()
    }
}

/// One cache per kind of provider data, each with its own TTL
#[derive(Debug, Clone)]
pub struct CacheManager {
    pub news: FetchCache<Vec<RawRecord>>,
    pub prices: FetchCache<PriceSeries>,
    pub macro_data: FetchCache<DebtSnapshot>,
}

impl CacheManager {
    pub fn new(news_ttl: Duration, prices_ttl: Duration, macro_ttl: Duration) -> Self {
        Self {
            news: FetchCache::new(news_ttl),
            prices: FetchCache::new(prices_ttl),
            macro_data: FetchCache::new(macro_ttl),
        }
    }

    /// Clear all caches
    pub async fn clear_all(&self) {
        self.news.clear().await;
        self.prices.clear().await;
        self.macro_data.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::raw::Tweet;

    fn records(n: usize) -> Vec<RawRecord> {
        (0..n)
            .map(|i| {
                RawRecord::Twitter(Tweet {
                    text: Some(format!("gold tweet {i}")),
                    ..Default::default()
                })
            })
            .collect()
    }

    #[test]
    fn test_cache_key_creation() {
        let key = CacheKey::new("newsapi", "news", serde_json::json!({"q": "gold"}));
        assert_eq!(key.source, "newsapi");
        assert_eq!(key.operation, "news");
        assert!(key.params.contains("gold"));
    }

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = FetchCache::new(Duration::from_secs(60));
        let key = CacheKey::new("newsapi", "news", ());

        cache.insert(key.clone(), records(2)).await;
        assert_eq!(cache.get(&key).await.map(|r| r.len()), Some(2));
    }

    #[tokio::test]
    async fn test_cache_get_or_fetch() {
        let cache = FetchCache::new(Duration::from_secs(60));
        let key = CacheKey::new("newsapi", "news", ());

        let mut call_count = 0;
        let result = cache
            .get_or_fetch(key.clone(), || {
                call_count += 1;
                async { Ok::<_, String>(records(3)) }
            })
            .await
            .unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(call_count, 1);

        let result = cache
            .get_or_fetch(key.clone(), || {
                call_count += 1;
                async { Ok::<_, String>(records(1)) }
            })
            .await
            .unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(call_count, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache: FetchCache<Vec<RawRecord>> = FetchCache::new(Duration::from_secs(60));
        let key = CacheKey::new("newsapi", "news", ());

        let result = cache
            .get_or_fetch(key.clone(), || async { Err::<Vec<RawRecord>, _>("down") })
            .await;
        assert!(result.is_err());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_expired_entries_are_refetched() {
        let cache = FetchCache::new(Duration::from_millis(50));
        let key = CacheKey::new("newsapi", "news", ());
        cache.insert(key.clone(), records(1)).await;

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_manager() {
        let manager = CacheManager::new(
            Duration::from_secs(60),
            Duration::from_secs(60),
            Duration::from_secs(60),
        );
        let key = CacheKey::new("builtin", "debt", ());

        manager.news.insert(key.clone(), records(1)).await;
        if let Some(snapshot) = DebtSnapshot::latest() {
            manager.macro_data.insert(key.clone(), snapshot).await;
        }
        assert_eq!(manager.news.len().await, 1);
        assert_eq!(manager.macro_data.len().await, 1);

        manager.clear_all().await;
        assert!(manager.news.is_empty().await);
        assert!(manager.macro_data.is_empty().await);

        let invalidated = manager.prices.clone();
        invalidated.invalidate(&key).await;
        assert!(manager.prices.is_empty().await);
    }
}
