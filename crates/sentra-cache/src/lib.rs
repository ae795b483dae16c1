//! # sentra-cache
//!
//! Shared key-value store implementations for Sentra. Two providers:
//!
//! - **memory**: In-process cache using [moka](https://crates.io/crates/moka)
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration. This store
//! backs rate-limit counters, escalation blocks, token revocation entries,
//! and the per-user token index.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
