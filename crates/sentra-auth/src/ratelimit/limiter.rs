//! Sliding-window rate limiter over the shared cache.
//!
//! Counters are read-modify-write pairs with no compare-and-swap: two
//! concurrent requests under one identifier can both read a stale count,
//! under-counting by one per concurrent pair. That is an accepted soft
//! limit (the store's `incr` exists if exact counting ever becomes a
//! requirement).
//!
//! Failure policy: storage errors on the read path **fail open**; an
//! outage must not turn into a total lockout. This is the opposite of the
//! revocation store's policy; do not unify them.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sentra_cache::keys;
use sentra_cache::provider::CacheManager;
use sentra_core::config::RateLimitConfig;
use sentra_core::result::AppResult;
use sentra_core::traits::cache::CacheProvider;

use super::class::RateLimitClass;

/// Sliding-window counter entry stored per (class, identifier) key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CounterEntry {
    /// Requests observed inside the current window.
    count: u32,
    /// When the current window rolls over.
    reset_at: DateTime<Utc>,
}

/// Escalated block entry stored once a window is exceeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlockEntry {
    /// When the block was set.
    blocked_at: DateTime<Utc>,
    /// When the block lapses.
    expires_at: DateTime<Utc>,
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitDecision {
    /// Whether the request may proceed.
    pub allowed: bool,
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// When the current window rolls over.
    pub reset_at: DateTime<Utc>,
    /// Whether an escalated block is in effect.
    pub blocked: bool,
    /// When the block lapses, if one is in effect.
    pub block_expires_at: Option<DateTime<Utc>>,
}

/// Sliding-window rate limiter with escalating blocks.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Shared cache for counters and block flags.
    cache: Arc<CacheManager>,
    /// Per-class limits.
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Creates a new rate limiter.
    pub fn new(cache: Arc<CacheManager>, config: RateLimitConfig) -> Self {
        Self { cache, config }
    }

    /// Checks (and counts) a request for the given identifier and class.
    ///
    /// 1. An unexpired block denies immediately; an expired one is removed.
    /// 2. The window counter is loaded or started fresh, then incremented.
    /// 3. Exceeding the class maximum sets a block and denies; otherwise
    ///    the updated counter is persisted and the request is allowed.
    pub async fn check(
        &self,
        identifier: &str,
        class: RateLimitClass,
    ) -> AppResult<RateLimitDecision> {
        let rule = class.rule(&self.config);
        let counter_key = keys::rate_counter(class.as_str(), identifier);
        let block_key = keys::rate_block(class.as_str(), identifier);
        let now = Utc::now();

        // Step 1: active block?
        match self.cache.get_json::<BlockEntry>(&block_key).await {
            Ok(Some(block)) => {
                if now < block.expires_at {
                    // Blocked requests do not touch the window counter.
                    return Ok(RateLimitDecision {
                        allowed: false,
                        remaining: 0,
                        reset_at: block.expires_at,
                        blocked: true,
                        block_expires_at: Some(block.expires_at),
                    });
                }
                let _ = self.cache.delete(&block_key).await;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(identifier, class = %class, error = %e, "Block lookup failed; failing open");
                return Ok(self.fail_open(rule.max_requests, now, rule.window_ms));
            }
        }

        // Step 2: load or roll the window.
        let entry = match self.cache.get_json::<CounterEntry>(&counter_key).await {
            Ok(Some(entry)) if now < entry.reset_at => CounterEntry {
                count: entry.count + 1,
                reset_at: entry.reset_at,
            },
            Ok(_) => CounterEntry {
                count: 1,
                reset_at: now + chrono::Duration::milliseconds(rule.window_ms as i64),
            },
            Err(e) => {
                warn!(identifier, class = %class, error = %e, "Counter lookup failed; failing open");
                return Ok(self.fail_open(rule.max_requests, now, rule.window_ms));
            }
        };

        // Step 3: over the limit, escalate to a block.
        if entry.count > rule.max_requests {
            let block = BlockEntry {
                blocked_at: now,
                expires_at: now + chrono::Duration::milliseconds(rule.block_duration_ms as i64),
            };
            if let Err(e) = self
                .cache
                .set_json(&block_key, &block, Duration::from_millis(rule.block_duration_ms))
                .await
            {
                warn!(identifier, class = %class, error = %e, "Failed to persist block entry");
            }
            debug!(identifier, class = %class, until = %block.expires_at, "Rate limit block set");
            return Ok(RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at: entry.reset_at,
                blocked: true,
                block_expires_at: Some(block.expires_at),
            });
        }

        // Persist the counter with a TTL matching the remaining window.
        let remaining_window = (entry.reset_at - now)
            .to_std()
            .unwrap_or(Duration::from_millis(rule.window_ms));
        if let Err(e) = self
            .cache
            .set_json(&counter_key, &entry, remaining_window)
            .await
        {
            warn!(identifier, class = %class, error = %e, "Counter persist failed; failing open");
            return Ok(self.fail_open(rule.max_requests, now, rule.window_ms));
        }

        Ok(RateLimitDecision {
            allowed: true,
            remaining: rule.max_requests - entry.count,
            reset_at: entry.reset_at,
            blocked: false,
            block_expires_at: None,
        })
    }

    /// Clears the counter and any block for the identifier and class.
    pub async fn reset(&self, identifier: &str, class: RateLimitClass) -> AppResult<()> {
        self.cache
            .delete(&keys::rate_counter(class.as_str(), identifier))
            .await?;
        self.cache
            .delete(&keys::rate_block(class.as_str(), identifier))
            .await?;
        Ok(())
    }

    /// Decision returned when the store is unreachable: allow the request.
    fn fail_open(&self, max: u32, now: DateTime<Utc>, window_ms: u64) -> RateLimitDecision {
        RateLimitDecision {
            allowed: true,
            remaining: max.saturating_sub(1),
            reset_at: now + chrono::Duration::milliseconds(window_ms as i64),
            blocked: false,
            block_expires_at: None,
        }
    }
}
