//! Redis cache provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use sentra_core::error::{AppError, ErrorKind};
use sentra_core::result::AppResult;
use sentra_core::traits::cache::CacheProvider;

use super::client::RedisClient;

/// Redis-backed cache provider.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    /// Redis client.
    client: RedisClient,
}

impl RedisCacheProvider {
    /// Create a new Redis cache provider.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: Option<String> = conn.get(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn
            .set_ex(&full_key, value, ttl.as_secs().max(1))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn.del(&full_key).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: bool = conn.exists(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn incr(&self, key: &str) -> AppResult<i64> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: i64 = conn.incr(&full_key, 1i64).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: bool = conn
            .expire(&full_key, ttl.as_secs() as i64)
            .await
            .map_err(Self::map_err)?;
        Ok(result)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }

    async fn flush_all(&self) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let _: () = redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}
