//! Cache key builders for all Sentra cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use uuid::Uuid;

/// Prefix applied to all Sentra cache keys.
const PREFIX: &str = "sentra";

// ── Revocation keys ────────────────────────────────────────

/// Cache key for a revoked token entry, keyed by jti.
pub fn revoked_token(jti: &str) -> String {
    format!("{PREFIX}:revoked:{jti}")
}

/// Cache key for the set of live token ids issued to a user.
pub fn user_token_index(tenant_id: Uuid, user_id: Uuid) -> String {
    format!("{PREFIX}:tokens:{tenant_id}:{user_id}")
}

// ── Rate limiter keys ──────────────────────────────────────

/// Cache key for a sliding-window counter.
pub fn rate_counter(class: &str, identifier: &str) -> String {
    format!("{PREFIX}:rate:{class}:{identifier}")
}

/// Cache key for an escalated block flag.
pub fn rate_block(class: &str, identifier: &str) -> String {
    format!("{PREFIX}:rate:block:{class}:{identifier}")
}
