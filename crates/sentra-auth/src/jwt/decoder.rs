//! JWT token validation and unsafe claims inspection.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use sentra_core::config::AuthConfig;
use sentra_core::error::AppError;

use super::claims::{Claims, TokenClass};

/// Validates JWT tokens against the shared secret and clock.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token string.
    ///
    /// Checks signature validity and expiration. Fails with
    /// `TokenExpired` for an elapsed `exp` and `TokenInvalid` for a bad
    /// signature or malformed token.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::token_expired(),
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::token_invalid("Invalid token signature")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::token_invalid("Invalid token format")
                    }
                    _ => AppError::token_invalid(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Decodes and validates an access token, rejecting other classes.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.verify(token)?;
        if claims.token_type != TokenClass::Access {
            return Err(AppError::token_invalid(
                "Invalid token type: expected access token",
            ));
        }
        Ok(claims)
    }

    /// Decodes and validates a refresh token, rejecting other classes.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.verify(token)?;
        if claims.token_type != TokenClass::Refresh {
            return Err(AppError::token_invalid(
                "Invalid token type: expected refresh token",
            ));
        }
        Ok(claims)
    }

    /// Decodes the claims segment without any signature or expiry check.
    ///
    /// Used for fast expiry inspection only; never trust the result for
    /// authorization decisions.
    pub fn decode_unsafe(&self, token: &str) -> Option<Claims> {
        let mut segments = token.split('.');
        let _header = segments.next()?;
        let payload = segments.next()?;
        let _signature = segments.next()?;
        if segments.next().is_some() {
            return None;
        }

        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Whether the claims expire within the given threshold.
    pub fn is_near_expiry(&self, claims: &Claims, threshold_minutes: i64) -> bool {
        claims.exp - Utc::now().timestamp() <= threshold_minutes * 60
    }
}
