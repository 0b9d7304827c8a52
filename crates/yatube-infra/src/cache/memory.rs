//! In-memory cache implementation - the default page cache and the Redis fallback.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache as MokaCache;

use yatube_core::ports::{Cache, CacheError};

/// Entry bound when none is configured.
pub const DEFAULT_MAX_ENTRIES: u64 = 1_000;

#[derive(Clone)]
struct CacheEntry {
    value: String,
    ttl: Option<Duration>,
}

/// Each entry lives for the TTL it was set with; overwriting restarts it.
struct EntryTtl;

impl Expiry<String, CacheEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.ttl
    }
}

/// Bounded in-memory cache.
///
/// Holds at most `max_entries` pages; past that the least useful ones are
/// evicted. Data is lost on process restart.
pub struct InMemoryCache {
    store: MokaCache<String, CacheEntry>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_max_entries(max_entries: u64) -> Self {
        Self {
            store: MokaCache::builder()
                .max_capacity(max_entries)
                .expire_after(EntryTtl)
                .build(),
        }
    }

    /// Number of live entries, after pending evictions have run.
    pub async fn len(&self) -> usize {
        self.store.run_pending_tasks().await;
        self.store.entry_count() as usize
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.store.get(key).await.map(|entry| entry.value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let entry = CacheEntry {
            value: value.to_string(),
            ttl,
        };
        self.store.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.store.invalidate_all();
        self.store.run_pending_tasks().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();
        cache.set("key1", "value1", None).await.unwrap();
        assert_eq!(cache.get("key1").await, Some("value1".to_string()));
        assert_eq!(cache.get("key2").await, None);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let cache = InMemoryCache::new();
        cache.set("index", "old", None).await.unwrap();
        cache
            .set("index", "new", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        assert_eq!(cache.get("index").await, Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = InMemoryCache::new();
        cache
            .set("page", "body", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        assert!(cache.get("page").await.is_some());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(cache.get("page").await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let cache = InMemoryCache::new();
        cache.set("a", "1", None).await.unwrap();
        cache
            .set("b", "2", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        assert_eq!(cache.len().await, 2);

        cache.clear().await.unwrap();
        assert!(cache.is_empty().await);
        assert_eq!(cache.get("a").await, None);
    }

    #[tokio::test]
    async fn test_distinct_keys_stay_bounded() {
        let cache = InMemoryCache::with_max_entries(50);
        for i in 0..500 {
            cache
                .set(&format!("index_page:/?x={i}"), "body", None)
                .await
                .unwrap();
        }

        assert!(cache.len().await <= 50);
    }
}
