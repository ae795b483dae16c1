//! Credential validation and the failed-attempt/lockout state machine.

use chrono::{Duration, Utc};
use tracing::{info, warn};

use sentra_core::config::AuthConfig;
use sentra_core::error::AppError;
use sentra_core::result::AppResult;
use sentra_entity::user::{User, UserStatus};

use crate::jwt::{IssuedToken, JwtEncoder, TokenPair};
use crate::password::{PasswordHasher, PasswordStrength, PasswordValidator};

/// Validates credentials, tracks failed attempts, and mints auth tokens.
///
/// Mutating operations (`process_failed_login`, `process_successful_login`)
/// update the `User` value in place; persisting the change is the caller's
/// job.
#[derive(Debug, Clone)]
pub struct AccountService {
    hasher: PasswordHasher,
    validator: PasswordValidator,
    encoder: JwtEncoder,
    /// Consecutive failures that trigger a lock.
    max_failed_attempts: i32,
    /// How long a triggered lock lasts.
    lockout_duration_minutes: u64,
}

impl AccountService {
    /// Creates an account service from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            hasher: PasswordHasher::new(config),
            validator: PasswordValidator::new(config),
            encoder: JwtEncoder::new(config),
            max_failed_attempts: config.max_failed_attempts,
            lockout_duration_minutes: config.lockout_duration_minutes,
        }
    }

    /// The password hasher this service was configured with.
    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Checks whether the account may authenticate right now.
    ///
    /// Each rejection carries its own message so operators can tell a
    /// lock from a deactivation in logs; the HTTP layer may still choose
    /// to collapse them for clients.
    pub fn check_status(&self, user: &User) -> AppResult<()> {
        if user.status == UserStatus::Inactive {
            return Err(AppError::account_not_active(
                "Account is deactivated. Please contact support.",
            ));
        }
        if user.is_locked() {
            return Err(AppError::account_not_active(
                "Account is temporarily locked due to repeated failed login attempts.",
            ));
        }
        Ok(())
    }

    /// Validates a plaintext password against the user's stored hash,
    /// gated on account status.
    ///
    /// Status is checked first so a locked account never reveals whether
    /// the supplied password was correct.
    pub fn validate_credentials(&self, user: &User, password: &str) -> AppResult<()> {
        self.check_status(user)?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::invalid_credentials());
        }
        Ok(())
    }

    /// Records a failed login attempt, locking the account once the
    /// configured threshold is reached.
    ///
    /// Returns `true` if this attempt triggered a lock.
    pub fn process_failed_login(&self, user: &mut User) -> bool {
        user.failed_login_attempts += 1;
        user.updated_at = Utc::now();

        if user.failed_login_attempts >= self.max_failed_attempts {
            user.status = UserStatus::Locked;
            user.locked_until =
                Some(Utc::now() + Duration::minutes(self.lockout_duration_minutes as i64));
            warn!(
                user_id = %user.id,
                attempts = user.failed_login_attempts,
                "Account locked after repeated failed logins"
            );
            return true;
        }
        false
    }

    /// Records a successful login: clears the failure counter and stamps
    /// the login time.
    ///
    /// Status is left untouched; an expired lock admits the user through
    /// `is_locked` without rewriting the status field here.
    pub fn process_successful_login(&self, user: &mut User) {
        user.failed_login_attempts = 0;
        user.locked_until = None;
        user.last_login_at = Some(Utc::now());
        user.updated_at = Utc::now();
        info!(user_id = %user.id, "Successful login recorded");
    }

    /// Mints an access + refresh pair for an authenticated user.
    pub fn create_auth_tokens(&self, user: &User) -> AppResult<TokenPair> {
        self.encoder.issue_pair(user, None, None)
    }

    /// Mints a standalone access token (non-rotating refresh).
    pub fn create_access_token(&self, user: &User) -> AppResult<IssuedToken> {
        self.encoder.issue_access(user)
    }

    /// Evaluates a candidate password against the configured policy.
    pub fn validate_password_strength(&self, password: &str) -> PasswordStrength {
        self.validator.validate(password)
    }

    /// Hashes a new plaintext password after policy validation.
    pub fn prepare_password(&self, password: &str) -> AppResult<String> {
        let strength = self.validator.validate(password);
        if !strength.is_valid {
            return Err(AppError::validation(strength.errors.join(" ")));
        }
        self.hasher.hash_password(password)
    }
}
