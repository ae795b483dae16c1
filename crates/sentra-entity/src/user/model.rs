//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::UserStatus;

/// A registered user, scoped to a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Tenant (organization) this user belongs to.
    pub tenant_id: Uuid,
    /// Email address, unique within a tenant.
    pub email: String,
    /// Login/display name.
    pub username: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role names assigned to the user (compared verbatim).
    pub roles: Vec<String>,
    /// Permission strings of the form `MODULE:ACTION`.
    pub permissions: Vec<String>,
    /// Account status.
    pub status: UserStatus,
    /// Number of consecutive failed login attempts.
    pub failed_login_attempts: i32,
    /// Account locked until this time (if locked).
    pub locked_until: Option<DateTime<Utc>>,
    /// Whether this user must complete a second factor after login.
    pub require_mfa: bool,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the user account is currently locked.
    ///
    /// A `Locked` status with an elapsed `locked_until` no longer bars
    /// authentication.
    pub fn is_locked(&self) -> bool {
        match self.locked_until {
            Some(locked_until) => Utc::now() < locked_until,
            None => self.status == UserStatus::Locked,
        }
    }

    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        if self.status == UserStatus::Inactive {
            return false;
        }
        if self.status == UserStatus::Locked {
            return !self.is_locked();
        }
        self.status.can_login()
    }
}
