//! JWT claims structure used in access and refresh tokens.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims payload embedded in every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// Tenant (organization) the subject belongs to.
    pub org_id: Uuid,
    /// Email address at issuance time.
    pub email: String,
    /// Username at issuance time.
    pub username: String,
    /// Role names at issuance time.
    pub roles: Vec<String>,
    /// Permission strings (`MODULE:ACTION`) at issuance time.
    pub permissions: Vec<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token id used as the revocation key. UUIDv7, so every
    /// issuance yields a fresh timestamp-plus-random identifier.
    pub jti: String,
    /// Token class: access or refresh.
    pub token_type: TokenClass,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenClass {
    /// Short-lived access token for API requests.
    Access,
    /// Long-lived refresh token for obtaining new access tokens.
    Refresh,
}

impl std::fmt::Display for TokenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "ACCESS"),
            Self::Refresh => write!(f, "REFRESH"),
        }
    }
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the tenant ID.
    pub fn tenant_id(&self) -> Uuid {
        self.org_id
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> chrono::DateTime<Utc> {
        chrono::DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Returns the remaining TTL in seconds (0 if expired).
    pub fn remaining_ttl_seconds(&self) -> u64 {
        let remaining = self.exp - Utc::now().timestamp();
        if remaining > 0 { remaining as u64 } else { 0 }
    }
}

/// Generate a fresh unique token id. UUIDv7 embeds the issuance
/// timestamp with a random suffix; reused jti values would corrupt the
/// revocation index.
pub(crate) fn new_jti() -> String {
    Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jti_uniqueness() {
        let a = new_jti();
        let b = new_jti();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_class_wire_format() {
        assert_eq!(
            serde_json::to_string(&TokenClass::Access).unwrap(),
            "\"ACCESS\""
        );
        assert_eq!(
            serde_json::to_string(&TokenClass::Refresh).unwrap(),
            "\"REFRESH\""
        );
    }
}
