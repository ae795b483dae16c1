//! Cache provider trait for pluggable shared-store backends.
//!
//! The shared key-value store backs rate-limit counters, block flags,
//! revocation entries, and the per-user token index. It is the only
//! mutable shared resource in the system.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for cache backends (Redis or in-memory).
///
/// All values are serialized as strings (JSON). The cache provider is
/// responsible for key prefixing and TTL enforcement. Every operation is
/// expected to complete or fail promptly; callers apply the fail-open /
/// fail-closed policy appropriate to their domain.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key from the cache.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key exists in the cache.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Increment an integer value by 1. Returns the new value.
    ///
    /// Kept as the atomic alternative to the limiter's read-modify-write
    /// counters should exact counting ever become a requirement.
    async fn incr(&self, key: &str) -> AppResult<i64>;

    /// Set the TTL on an existing key. Returns `false` if the key is absent.
    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool>;

    /// Get a typed value by deserializing from JSON.
    async fn get_json<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> AppResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key).await? {
            Some(value) => {
                let parsed = serde_json::from_str(&value)?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value by serializing to JSON.
    async fn set_json<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value)?;
        self.set(key, &json, ttl).await
    }

    /// Check that the cache backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Flush all entries from the cache.
    async fn flush_all(&self) -> AppResult<()>;
}
