//! Revocation entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why a token was revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationReason {
    /// The user logged out.
    Logout,
    /// A security response (cascading revocation, suspicious activity).
    Security,
    /// The password was changed.
    PasswordChange,
    /// An administrator revoked the token.
    AdminAction,
}

impl std::fmt::Display for RevocationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logout => write!(f, "LOGOUT"),
            Self::Security => write!(f, "SECURITY"),
            Self::PasswordChange => write!(f, "PASSWORD_CHANGE"),
            Self::AdminAction => write!(f, "ADMIN_ACTION"),
        }
    }
}

/// A revoked-token record. Expires with the token it revokes: once the
/// token's own expiry passes the entry is moot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevocationEntry {
    /// The revoked token id.
    pub jti: String,
    /// The user the token belonged to.
    pub user_id: Uuid,
    /// Tenant scope.
    pub tenant_id: Uuid,
    /// When the token was blacklisted.
    pub blacklisted_at: DateTime<Utc>,
    /// The original token expiry, mirrored as the store TTL.
    pub expires_at: DateTime<Utc>,
    /// Why the token was revoked.
    pub reason: RevocationReason,
}
