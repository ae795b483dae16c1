//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub jwt_access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub jwt_refresh_ttl_days: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Maximum password length.
    #[serde(default = "default_password_max")]
    pub password_max_length: usize,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_argon2_memory")]
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count.
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    /// Maximum failed login attempts before lockout.
    #[serde(default = "default_max_failed")]
    pub max_failed_attempts: i32,
    /// Account lockout duration in minutes.
    #[serde(default = "default_lockout")]
    pub lockout_duration_minutes: u64,
    /// Whether tenants require a second factor after password login.
    #[serde(default)]
    pub require_mfa: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_access_ttl_minutes: default_access_ttl(),
            jwt_refresh_ttl_days: default_refresh_ttl(),
            password_min_length: default_password_min(),
            password_max_length: default_password_max(),
            argon2_memory_kib: default_argon2_memory(),
            argon2_iterations: default_argon2_iterations(),
            max_failed_attempts: default_max_failed(),
            lockout_duration_minutes: default_lockout(),
            require_mfa: false,
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_password_min() -> usize {
    8
}

fn default_password_max() -> usize {
    128
}

fn default_argon2_memory() -> u32 {
    19456
}

fn default_argon2_iterations() -> u32 {
    2
}

fn default_max_failed() -> i32 {
    5
}

fn default_lockout() -> u64 {
    30
}
