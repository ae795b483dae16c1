//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use sentra_core::config::AuthConfig;
use sentra_core::error::AppError;
use sentra_entity::user::User;

use super::claims::{Claims, TokenClass, new_jti};

/// Creates signed JWT access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Access token TTL in minutes.
    access_ttl_minutes: i64,
    /// Refresh token TTL in days.
    refresh_ttl_days: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .finish()
    }
}

/// Result of a successful token pair generation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
    /// jti of the access token.
    pub access_jti: String,
    /// jti of the refresh token.
    pub refresh_jti: String,
}

/// A single issued token with its metadata.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The signed compact token.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
    /// Unique token id.
    pub jti: String,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl_minutes: config.jwt_access_ttl_minutes as i64,
            refresh_ttl_days: config.jwt_refresh_ttl_days as i64,
        }
    }

    /// Issues a single signed token of the given class and TTL.
    pub fn issue(
        &self,
        user: &User,
        class: TokenClass,
        ttl: chrono::Duration,
    ) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            sub: user.id,
            org_id: user.tenant_id,
            email: user.email.clone(),
            username: user.username.clone(),
            roles: user.roles.clone(),
            permissions: user.permissions.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: new_jti(),
            token_type: class,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode {class} token: {e}")))?;

        Ok(IssuedToken {
            token,
            expires_at,
            jti: claims.jti,
        })
    }

    /// Generates a new access + refresh token pair for the given user.
    ///
    /// The pair is created atomically: either both tokens exist or
    /// neither does. TTL overrides fall back to the configured values.
    pub fn issue_pair(
        &self,
        user: &User,
        access_ttl_minutes: Option<u64>,
        refresh_ttl_days: Option<u64>,
    ) -> Result<TokenPair, AppError> {
        let access_ttl = chrono::Duration::minutes(
            access_ttl_minutes.map_or(self.access_ttl_minutes, |m| m as i64),
        );
        let refresh_ttl =
            chrono::Duration::days(refresh_ttl_days.map_or(self.refresh_ttl_days, |d| d as i64));

        let access = self.issue(user, TokenClass::Access, access_ttl)?;
        let refresh = self.issue(user, TokenClass::Refresh, refresh_ttl)?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            access_expires_at: access.expires_at,
            refresh_expires_at: refresh.expires_at,
            access_jti: access.jti,
            refresh_jti: refresh.jti,
        })
    }

    /// Generates a standalone access token (e.g., after refresh).
    pub fn issue_access(&self, user: &User) -> Result<IssuedToken, AppError> {
        self.issue(
            user,
            TokenClass::Access,
            chrono::Duration::minutes(self.access_ttl_minutes),
        )
    }
}
