//! Rate limiter classes.

use serde::{Deserialize, Serialize};

use sentra_core::config::{RateLimitConfig, RateLimitRule};

/// Traffic class a limit applies to. Each class has its own window,
/// maximum, and block duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitClass {
    /// General traffic per client IP.
    Ip,
    /// Authenticated traffic per user.
    User,
    /// Login attempts.
    Login,
    /// Refresh token exchanges.
    RefreshToken,
    /// Password reset requests.
    PasswordReset,
    /// One-time code issuance.
    OtpRequest,
    /// Bulk operations (exports, batch updates).
    Bulk,
}

impl RateLimitClass {
    /// Return the class as a lowercase string, used in cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ip => "ip",
            Self::User => "user",
            Self::Login => "login",
            Self::RefreshToken => "refresh_token",
            Self::PasswordReset => "password_reset",
            Self::OtpRequest => "otp_request",
            Self::Bulk => "bulk",
        }
    }

    /// Look up the configured rule for this class.
    pub fn rule(&self, config: &RateLimitConfig) -> RateLimitRule {
        match self {
            Self::Ip => config.ip,
            Self::User => config.user,
            Self::Login => config.login,
            Self::RefreshToken => config.refresh_token,
            Self::PasswordReset => config.password_reset,
            Self::OtpRequest => config.otp_request,
            Self::Bulk => config.bulk,
        }
    }
}

impl std::fmt::Display for RateLimitClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
