//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted login session.
///
/// Raw tokens are never stored; sessions carry sha256 hashes so that a
/// presented token can be matched without a plaintext copy existing
/// anywhere at rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Tenant scope.
    pub tenant_id: Uuid,
    /// sha256 hex digest of the access token.
    pub access_token_hash: String,
    /// sha256 hex digest of the refresh token.
    pub refresh_token_hash: String,
    /// Client IP at login.
    pub ip_address: String,
    /// Client user agent at login.
    pub user_agent: Option<String>,
    /// Whether the session is still honorable.
    pub is_active: bool,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry, regardless of activity.
    pub expires_at: DateTime<Utc>,
    /// Last observed activity.
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Check whether the session is live: active and not past its
    /// absolute expiry.
    pub fn is_live(&self) -> bool {
        self.is_active && self.expires_at > Utc::now()
    }
}
