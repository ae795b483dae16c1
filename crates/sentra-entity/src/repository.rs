//! Tenant-scoped persistence traits.
//!
//! Storage is an external collaborator: Sentra consumes these interfaces
//! and never assumes a concrete backend. Every method takes the tenant id
//! explicitly; implementations must filter by it on every query.

use async_trait::async_trait;
use uuid::Uuid;

use sentra_core::result::AppResult;

use crate::otp::{Otp, OtpKind};
use crate::session::Session;
use crate::user::User;

/// Row-oriented user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by email within a tenant (case-insensitive email).
    async fn find_by_email(&self, email: &str, tenant_id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by primary key within a tenant.
    async fn find_by_id(&self, id: Uuid, tenant_id: Uuid) -> AppResult<Option<User>>;

    /// Persist the full user record (insert or update).
    async fn save(&self, user: &User) -> AppResult<()>;
}

/// Row-oriented session persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a session by a token hash (access or refresh) within a tenant.
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
        tenant_id: Uuid,
    ) -> AppResult<Option<Session>>;

    /// Persist the full session record (insert or update).
    async fn save(&self, session: &Session) -> AppResult<()>;

    /// Delete every session belonging to a user. Returns the count removed.
    async fn delete_by_user(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<u64>;
}

/// Row-oriented one-time-code persistence.
#[async_trait]
pub trait OtpRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find the most recent code of a kind for an email within a tenant.
    async fn find_by_email(
        &self,
        email: &str,
        tenant_id: Uuid,
        kind: OtpKind,
    ) -> AppResult<Option<Otp>>;

    /// Persist the full code record (insert or update).
    async fn save(&self, otp: &Otp) -> AppResult<()>;
}
