//! Sliding-window rate limiter configuration.
//!
//! Each limiter class carries its own window, maximum, and block duration.
//! Login and password-reset classes are the tightest since they guard
//! credential-guessing surfaces.

use serde::{Deserialize, Serialize};

/// Limits for a single rate limiter class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateLimitRule {
    /// Maximum requests allowed inside one window.
    pub max_requests: u32,
    /// Sliding window length in milliseconds.
    pub window_ms: u64,
    /// Duration of the escalated block once the window is exceeded.
    pub block_duration_ms: u64,
}

impl RateLimitRule {
    /// Shorthand constructor used by the per-class defaults.
    pub const fn new(max_requests: u32, window_ms: u64, block_duration_ms: u64) -> Self {
        Self {
            max_requests,
            window_ms,
            block_duration_ms,
        }
    }
}

/// Per-class rate limiter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Per-IP general traffic limit.
    #[serde(default = "default_ip")]
    pub ip: RateLimitRule,
    /// Per-user authenticated traffic limit.
    #[serde(default = "default_user")]
    pub user: RateLimitRule,
    /// Login attempt limit (per IP).
    #[serde(default = "default_login")]
    pub login: RateLimitRule,
    /// Refresh token exchange limit.
    #[serde(default = "default_refresh_token")]
    pub refresh_token: RateLimitRule,
    /// Password reset request limit.
    #[serde(default = "default_password_reset")]
    pub password_reset: RateLimitRule,
    /// One-time code issuance limit.
    #[serde(default = "default_otp_request")]
    pub otp_request: RateLimitRule,
    /// Bulk operation limit (exports, batch updates).
    #[serde(default = "default_bulk")]
    pub bulk: RateLimitRule,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            ip: default_ip(),
            user: default_user(),
            login: default_login(),
            refresh_token: default_refresh_token(),
            password_reset: default_password_reset(),
            otp_request: default_otp_request(),
            bulk: default_bulk(),
        }
    }
}

fn default_ip() -> RateLimitRule {
    RateLimitRule::new(100, 60_000, 300_000)
}

fn default_user() -> RateLimitRule {
    RateLimitRule::new(300, 60_000, 300_000)
}

fn default_login() -> RateLimitRule {
    RateLimitRule::new(5, 900_000, 1_800_000)
}

fn default_refresh_token() -> RateLimitRule {
    RateLimitRule::new(10, 900_000, 900_000)
}

fn default_password_reset() -> RateLimitRule {
    RateLimitRule::new(3, 3_600_000, 3_600_000)
}

fn default_otp_request() -> RateLimitRule {
    RateLimitRule::new(3, 600_000, 1_800_000)
}

fn default_bulk() -> RateLimitRule {
    RateLimitRule::new(10, 3_600_000, 600_000)
}
