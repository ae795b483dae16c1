//! Session persistence over the repository trait.

use std::sync::Arc;

use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use sentra_core::config::SessionConfig;
use sentra_core::result::AppResult;
use sentra_entity::repository::SessionRepository;
use sentra_entity::session::Session;
use sentra_entity::user::User;

use crate::jwt::TokenPair;

/// Creates and maintains session records. Raw tokens never reach the
/// repository; lookups go through sha256 hex digests.
#[derive(Debug, Clone)]
pub struct SessionStore {
    repository: Arc<dyn SessionRepository>,
    /// Absolute session lifetime in hours.
    absolute_timeout_hours: u64,
}

/// sha256 hex digest of a token, the only form sessions store.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl SessionStore {
    /// Creates a new session store.
    pub fn new(repository: Arc<dyn SessionRepository>, config: &SessionConfig) -> Self {
        Self {
            repository,
            absolute_timeout_hours: config.absolute_timeout_hours,
        }
    }

    /// Persists a new session for a freshly issued token pair.
    pub async fn create_session(
        &self,
        user: &User,
        tokens: &TokenPair,
        ip_address: &str,
        user_agent: Option<&str>,
    ) -> AppResult<Session> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user_id: user.id,
            tenant_id: user.tenant_id,
            access_token_hash: hash_token(&tokens.access_token),
            refresh_token_hash: hash_token(&tokens.refresh_token),
            ip_address: ip_address.to_string(),
            user_agent: user_agent.map(String::from),
            is_active: true,
            created_at: now,
            expires_at: now + Duration::hours(self.absolute_timeout_hours as i64),
            last_activity: now,
        };

        self.repository.save(&session).await?;
        Ok(session)
    }

    /// Finds the live session matching a raw token, if any.
    pub async fn find_by_token(&self, token: &str, tenant_id: Uuid) -> AppResult<Option<Session>> {
        let session = self
            .repository
            .find_by_token_hash(&hash_token(token), tenant_id)
            .await?;
        Ok(session.filter(Session::is_live))
    }

    /// Marks the session matching a raw token inactive. A missing session
    /// is a no-op: logout must be idempotent.
    pub async fn deactivate_by_token(&self, token: &str, tenant_id: Uuid) -> AppResult<()> {
        if let Some(mut session) = self
            .repository
            .find_by_token_hash(&hash_token(token), tenant_id)
            .await?
        {
            session.is_active = false;
            session.last_activity = Utc::now();
            self.repository.save(&session).await?;
        }
        Ok(())
    }

    /// Re-points an existing session at a rotated token pair.
    pub async fn rebind_tokens(&self, session: &mut Session, tokens: &TokenPair) -> AppResult<()> {
        session.access_token_hash = hash_token(&tokens.access_token);
        session.refresh_token_hash = hash_token(&tokens.refresh_token);
        session.last_activity = Utc::now();
        self.repository.save(session).await
    }

    /// Re-points the session's access binding after a non-rotating
    /// refresh, located via the unchanged refresh token. Without this a
    /// later logout with the new access token would miss the session.
    pub async fn rebind_access_token(
        &self,
        refresh_token: &str,
        tenant_id: Uuid,
        access_token: &str,
    ) -> AppResult<()> {
        if let Some(mut session) = self
            .repository
            .find_by_token_hash(&hash_token(refresh_token), tenant_id)
            .await?
        {
            session.access_token_hash = hash_token(access_token);
            session.last_activity = Utc::now();
            self.repository.save(&session).await?;
        }
        Ok(())
    }

    /// Stamps activity on a session.
    pub async fn touch(&self, session: &mut Session) -> AppResult<()> {
        session.last_activity = Utc::now();
        self.repository.save(session).await
    }

    /// Removes every session belonging to the user. Returns the count.
    pub async fn delete_all_for_user(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<u64> {
        self.repository.delete_by_user(user_id, tenant_id).await
    }
}
