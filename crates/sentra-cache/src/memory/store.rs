//! In-memory cache implementation using the moka crate.
//!
//! Revocation entries and rate-limit blocks rely on exact per-key TTLs,
//! so every entry carries its own deadline which is enforced on read.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;

use sentra_core::config::cache::MemoryCacheConfig;
use sentra_core::result::AppResult;
use sentra_core::traits::cache::CacheProvider;

/// Deadline applied to counters, which have no TTL until `expire` is called.
const COUNTER_DEADLINE: Duration = Duration::from_secs(3600);

/// A stored value with its expiry deadline.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-memory cache provider using moka.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// The underlying moka cache.
    cache: Cache<String, Entry>,
    /// Counters stored separately for atomic incr.
    counters: Arc<dashmap::DashMap<String, AtomicI64>>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder().max_capacity(config.max_capacity).build();

        Self {
            cache,
            counters: Arc::new(dashmap::DashMap::new()),
        }
    }

    /// Fetch an entry, evicting it if its deadline has passed.
    async fn live_entry(&self, key: &str) -> Option<Entry> {
        let entry = self.cache.get(key).await?;
        if Instant::now() >= entry.expires_at {
            self.cache.invalidate(key).await;
            return None;
        }
        Some(entry)
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.live_entry(key).await.map(|e| e.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.invalidate(key).await;
        self.counters.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.live_entry(key).await.is_some())
    }

    async fn incr(&self, key: &str) -> AppResult<i64> {
        let entry = self
            .counters
            .entry(key.to_string())
            .or_insert_with(|| AtomicI64::new(0));
        let new_val = entry.value().fetch_add(1, Ordering::SeqCst) + 1;
        drop(entry);
        // Mirror into the cache for get() visibility.
        let mirror = Entry {
            value: new_val.to_string(),
            expires_at: Instant::now() + COUNTER_DEADLINE,
        };
        self.cache.insert(key.to_string(), mirror).await;
        Ok(new_val)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        match self.live_entry(key).await {
            Some(entry) => {
                let refreshed = Entry {
                    value: entry.value,
                    expires_at: Instant::now() + ttl,
                };
                self.cache.insert(key.to_string(), refreshed).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn flush_all(&self) -> AppResult<()> {
        self.cache.invalidate_all();
        self.counters.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_provider() -> MemoryCacheProvider {
        MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 1000 })
    }

    #[tokio::test]
    async fn test_set_get() {
        let provider = make_provider();
        provider
            .set("key1", "value1", Duration::from_secs(60))
            .await
            .unwrap();
        let val = provider.get("key1").await.unwrap();
        assert_eq!(val, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let provider = make_provider();
        provider
            .set("key2", "value2", Duration::from_secs(60))
            .await
            .unwrap();
        provider.delete("key2").await.unwrap();
        let val = provider.get("key2").await.unwrap();
        assert_eq!(val, None);
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let provider = make_provider();
        provider
            .set("short", "v", Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(provider.get("short").await.unwrap(), None);
        assert!(!provider.exists("short").await.unwrap());
    }

    #[tokio::test]
    async fn test_incr() {
        let provider = make_provider();
        assert_eq!(provider.incr("counter").await.unwrap(), 1);
        assert_eq!(provider.incr("counter").await.unwrap(), 2);
        assert_eq!(provider.get("counter").await.unwrap(), Some("2".into()));
    }

    #[tokio::test]
    async fn test_expire_refreshes_deadline() {
        let provider = make_provider();
        provider
            .set("k", "v", Duration::from_millis(20))
            .await
            .unwrap();
        assert!(provider.expire("k", Duration::from_secs(60)).await.unwrap());
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(provider.get("k").await.unwrap(), Some("v".into()));
        assert!(!provider.expire("missing", Duration::from_secs(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_json_roundtrip() {
        let provider = make_provider();
        let data = serde_json::json!({"name": "test", "count": 42});
        provider
            .set_json("json_key", &data, Duration::from_secs(60))
            .await
            .unwrap();
        let result: Option<serde_json::Value> = provider.get_json("json_key").await.unwrap();
        assert_eq!(result, Some(data));
    }

    #[tokio::test]
    async fn test_health_check() {
        let provider = make_provider();
        assert!(provider.health_check().await.unwrap());
    }
}
