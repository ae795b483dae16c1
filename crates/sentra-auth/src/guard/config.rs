//! Guard behavior configuration.

use serde::{Deserialize, Serialize};

use crate::ratelimit::RateLimitClass;

/// Per-route guard configuration.
///
/// Defaults are the strict profile; routes opt *out* of checks rather
/// than opting in, so forgetting to configure a route leaves it fully
/// protected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Reject requests without a valid access token. When false, a
    /// missing token yields an anonymous pass-through instead.
    #[serde(default = "default_true")]
    pub require_auth: bool,
    /// Check the token against the revocation blacklist.
    #[serde(default = "default_true")]
    pub check_blacklist: bool,
    /// Apply a per-user rate limit.
    #[serde(default = "default_true")]
    pub check_rate_limit: bool,
    /// Which rate limit class applies when `check_rate_limit` is set.
    #[serde(default = "default_class")]
    pub rate_limit_class: RateLimitClass,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            check_blacklist: true,
            check_rate_limit: true,
            rate_limit_class: default_class(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_class() -> RateLimitClass {
    RateLimitClass::User
}
