//! Unified application error types for Sentra.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Each [`ErrorKind`] carries a stable,
//! transport-independent error code; user-facing messages never contain
//! password hashes, raw tokens, or internal stack detail.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Unknown user or wrong password. Deliberately indistinguishable
    /// externally to prevent account enumeration.
    InvalidCredentials,
    /// The account exists but is inactive or locked.
    AccountNotActive,
    /// A rate limit or escalated block is in effect.
    RateLimited,
    /// Token is malformed or carries a bad signature.
    TokenInvalid,
    /// Token expiry has passed.
    TokenExpired,
    /// Token was revoked before its expiry.
    TokenRevoked,
    /// Catch-all for downstream failures during an otherwise-valid login.
    /// The specific cause is logged internally, never surfaced.
    AuthenticationFailed,
    /// The caller lacks one or more required permissions.
    InsufficientPermissions,
    /// The caller lacks the required role.
    InsufficientRole,
    /// Input validation failed.
    Validation,
    /// The requested resource was not found.
    NotFound,
    /// A conflict occurred (duplicate entry, concurrent modification, etc.).
    Conflict,
    /// A cache/shared-store error occurred.
    Cache,
    /// A persistence error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::AccountNotActive => write!(f, "ACCOUNT_NOT_ACTIVE"),
            Self::RateLimited => write!(f, "RATE_LIMITED"),
            Self::TokenInvalid => write!(f, "TOKEN_INVALID"),
            Self::TokenExpired => write!(f, "TOKEN_EXPIRED"),
            Self::TokenRevoked => write!(f, "TOKEN_REVOKED"),
            Self::AuthenticationFailed => write!(f, "AUTHENTICATION_FAILED"),
            Self::InsufficientPermissions => write!(f, "INSUFFICIENT_PERMISSIONS"),
            Self::InsufficientRole => write!(f, "INSUFFICIENT_ROLE"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Cache => write!(f, "CACHE"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Sentra.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-credentials error with the standard message.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid email or password")
    }

    /// Create an account-not-active error.
    pub fn account_not_active(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountNotActive, message)
    }

    /// Create a rate-limited error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimited, message)
    }

    /// Create a token-invalid error.
    pub fn token_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenInvalid, message)
    }

    /// Create a token-expired error.
    pub fn token_expired() -> Self {
        Self::new(ErrorKind::TokenExpired, "Token has expired")
    }

    /// Create a token-revoked error.
    pub fn token_revoked() -> Self {
        Self::new(ErrorKind::TokenRevoked, "Token has been revoked")
    }

    /// Create the generic authentication-failed error. The real cause must
    /// be logged by the caller before constructing this.
    pub fn authentication_failed() -> Self {
        Self::new(
            ErrorKind::AuthenticationFailed,
            "Authentication failed. Please try again.",
        )
    }

    /// Create an insufficient-permissions error.
    pub fn insufficient_permissions(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientPermissions, message)
    }

    /// Create an insufficient-role error.
    pub fn insufficient_role(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientRole, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_error_codes() {
        assert_eq!(
            AppError::invalid_credentials().kind.to_string(),
            "INVALID_CREDENTIALS"
        );
        assert_eq!(AppError::token_expired().kind.to_string(), "TOKEN_EXPIRED");
        assert_eq!(
            AppError::authentication_failed().kind.to_string(),
            "AUTHENTICATION_FAILED"
        );
    }

    #[test]
    fn test_generic_message_hides_cause() {
        let err = AppError::authentication_failed();
        assert!(!err.message.to_lowercase().contains("database"));
        assert!(!err.message.to_lowercase().contains("token"));
    }
}
