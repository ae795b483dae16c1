//! Revocation store over the shared cache.
//!
//! Failure policy: `is_revoked` **fails closed**. A storage error reports
//! the token as revoked, since admitting a revoked token is the worse
//! failure mode. Writes surface their errors to the caller. This is the
//! opposite of the rate limiter's fail-open policy; do not unify them.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use sentra_cache::keys;
use sentra_cache::provider::CacheManager;
use sentra_core::result::AppResult;
use sentra_core::traits::cache::CacheProvider;

use super::entry::{RevocationEntry, RevocationReason};

/// One live token tracked in the per-user index.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexedToken {
    /// Token id.
    jti: String,
    /// The token's own expiry; index entries past it are pruned.
    expires_at: DateTime<Utc>,
}

/// Tracks revoked tokens and the set of live tokens per user.
#[derive(Debug, Clone)]
pub struct RevocationStore {
    /// Shared cache.
    cache: Arc<CacheManager>,
}

impl RevocationStore {
    /// Creates a new revocation store.
    pub fn new(cache: Arc<CacheManager>) -> Self {
        Self { cache }
    }

    /// Records a freshly issued token in the user's token index so a later
    /// cascade (`revoke_all_for_user`) covers it.
    pub async fn register(
        &self,
        jti: &str,
        user_id: Uuid,
        tenant_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.index_token(jti, user_id, tenant_id, expires_at).await
    }

    /// Revokes a token by jti.
    ///
    /// The entry's TTL mirrors the token's remaining lifetime, so it
    /// self-expires with the token. Revoking an already-expired token is
    /// moot and returns without writing. Storage errors surface to the
    /// caller; this is a correctness-critical write.
    pub async fn revoke(
        &self,
        jti: &str,
        user_id: Uuid,
        tenant_id: Uuid,
        expires_at: DateTime<Utc>,
        reason: RevocationReason,
    ) -> AppResult<()> {
        let now = Utc::now();
        let Ok(ttl) = (expires_at - now).to_std() else {
            return Ok(());
        };

        let entry = RevocationEntry {
            jti: jti.to_string(),
            user_id,
            tenant_id,
            blacklisted_at: now,
            expires_at,
            reason,
        };

        self.cache
            .set_json(&keys::revoked_token(jti), &entry, ttl)
            .await?;
        self.index_token(jti, user_id, tenant_id, expires_at).await?;

        info!(jti, user_id = %user_id, reason = %reason, "Token revoked");
        Ok(())
    }

    /// Whether the token id has been revoked. Fails closed: a storage
    /// error reports `true`.
    pub async fn is_revoked(&self, jti: &str) -> bool {
        match self.cache.exists(&keys::revoked_token(jti)).await {
            Ok(revoked) => revoked,
            Err(e) => {
                warn!(jti, error = %e, "Revocation lookup failed; treating token as revoked");
                true
            }
        }
    }

    /// Returns the revocation entry for a token id, if one exists.
    pub async fn describe(&self, jti: &str) -> AppResult<Option<RevocationEntry>> {
        self.cache.get_json(&keys::revoked_token(jti)).await
    }

    /// Revokes every live token known for the user with reason Security.
    ///
    /// Returns the count actually revoked; ids that were already revoked
    /// are not double-counted.
    pub async fn revoke_all_for_user(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<u64> {
        let index_key = keys::user_token_index(tenant_id, user_id);
        let tokens: Vec<IndexedToken> = self
            .cache
            .get_json(&index_key)
            .await?
            .unwrap_or_default();

        let now = Utc::now();
        let mut revoked = 0u64;

        for token in tokens {
            if token.expires_at <= now {
                continue;
            }
            if self.cache.exists(&keys::revoked_token(&token.jti)).await? {
                continue;
            }
            self.revoke(
                &token.jti,
                user_id,
                tenant_id,
                token.expires_at,
                RevocationReason::Security,
            )
            .await?;
            revoked += 1;
        }

        info!(user_id = %user_id, count = revoked, "Cascade revocation completed");
        Ok(revoked)
    }

    /// Appends a jti to the user's token index, deduplicated, pruning
    /// expired entries. The index TTL covers its longest-lived entry.
    async fn index_token(
        &self,
        jti: &str,
        user_id: Uuid,
        tenant_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let now = Utc::now();
        if expires_at <= now {
            return Ok(());
        }

        let index_key = keys::user_token_index(tenant_id, user_id);
        let mut tokens: Vec<IndexedToken> = self
            .cache
            .get_json(&index_key)
            .await?
            .unwrap_or_default();

        tokens.retain(|t| t.expires_at > now && t.jti != jti);
        tokens.push(IndexedToken {
            jti: jti.to_string(),
            expires_at,
        });

        let horizon = tokens
            .iter()
            .map(|t| t.expires_at)
            .max()
            .unwrap_or(expires_at);
        let ttl = (horizon - now).to_std().unwrap_or(Duration::from_secs(60));

        self.cache.set_json(&index_key, &tokens, ttl).await
    }
}
