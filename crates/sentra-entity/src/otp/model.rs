//! One-time code entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Purpose of a one-time code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpKind {
    /// Code sent to reset a forgotten password.
    PasswordReset,
    /// Code sent to activate a new account.
    AccountActivation,
    /// Code used as a second login factor.
    TwoFactor,
}

impl OtpKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PasswordReset => "password_reset",
            Self::AccountActivation => "account_activation",
            Self::TwoFactor => "two_factor",
        }
    }
}

impl std::fmt::Display for OtpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A six-digit one-time code bound to an email address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Otp {
    /// Unique identifier.
    pub id: Uuid,
    /// Tenant scope.
    pub tenant_id: Uuid,
    /// Email the code was sent to.
    pub email: String,
    /// Six-digit numeric code.
    pub code: String,
    /// Purpose of the code.
    pub kind: OtpKind,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Whether the code has been consumed.
    pub is_used: bool,
    /// Verification attempts made so far.
    pub attempts: i32,
    /// Maximum allowed verification attempts.
    pub max_attempts: i32,
    /// When the code was created.
    pub created_at: DateTime<Utc>,
}

impl Otp {
    /// A code is valid only while it is unused, under its attempt budget,
    /// and not expired.
    pub fn is_valid(&self) -> bool {
        !self.is_used && self.attempts < self.max_attempts && Utc::now() < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn otp() -> Otp {
        Otp {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            email: "user@example.com".into(),
            code: "123456".into(),
            kind: OtpKind::PasswordReset,
            expires_at: Utc::now() + Duration::minutes(10),
            is_used: false,
            attempts: 0,
            max_attempts: 5,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_fresh_code_is_valid() {
        assert!(otp().is_valid());
    }

    #[test]
    fn test_used_code_is_invalid() {
        let mut o = otp();
        o.is_used = true;
        assert!(!o.is_valid());
    }

    #[test]
    fn test_exhausted_code_is_invalid() {
        let mut o = otp();
        o.attempts = o.max_attempts;
        assert!(!o.is_valid());
    }

    #[test]
    fn test_expired_code_is_invalid() {
        let mut o = otp();
        o.expires_at = Utc::now() - Duration::seconds(1);
        assert!(!o.is_valid());
    }
}
