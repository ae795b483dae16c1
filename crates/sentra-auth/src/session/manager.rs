//! Login, refresh, and logout orchestration.
//!
//! Error discipline: once credentials have been accepted, any downstream
//! failure (token minting, revocation bookkeeping, session persistence)
//! is logged with its real cause and surfaced as the generic
//! `AuthenticationFailed` so internals never leak to clients. Before
//! credential acceptance, the distinct `InvalidCredentials`,
//! `AccountNotActive`, and `RateLimited` kinds apply.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use sentra_core::error::{AppError, ErrorKind};
use sentra_core::result::AppResult;
use sentra_entity::repository::UserRepository;
use sentra_entity::session::Session;
use sentra_entity::user::User;

use crate::account::AccountService;
use crate::jwt::{JwtDecoder, TokenPair};
use crate::ratelimit::{RateLimitClass, RateLimiter};
use crate::revocation::{RevocationReason, RevocationStore};

use super::store::SessionStore;

/// Successful login payload.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// The issued token pair.
    pub tokens: TokenPair,
    /// The persisted session.
    pub session: Session,
    /// The user as updated by the login (counters reset, login stamped).
    pub user: User,
    /// Whether the caller must complete a second factor before treating
    /// the session as fully authenticated.
    pub mfa_required: bool,
}

/// Orchestrates the full authentication lifecycle.
#[derive(Debug, Clone)]
pub struct SessionManager {
    users: Arc<dyn UserRepository>,
    sessions: SessionStore,
    account: AccountService,
    decoder: JwtDecoder,
    revocation: RevocationStore,
    limiter: RateLimiter,
    /// Tenant-wide second-factor requirement, OR-ed with the per-user flag.
    require_mfa: bool,
}

impl SessionManager {
    /// Creates a new session manager from its collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: SessionStore,
        account: AccountService,
        decoder: JwtDecoder,
        revocation: RevocationStore,
        limiter: RateLimiter,
        require_mfa: bool,
    ) -> Self {
        Self {
            users,
            sessions,
            account,
            decoder,
            revocation,
            limiter,
            require_mfa,
        }
    }

    /// Authenticates a user and opens a session.
    ///
    /// Failed attempts count toward the account lockout; the login rate
    /// limit is keyed by client IP and checked before any credential work.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        tenant_id: Uuid,
        ip_address: &str,
        user_agent: Option<&str>,
    ) -> AppResult<LoginResult> {
        let decision = self.limiter.check(ip_address, RateLimitClass::Login).await?;
        if !decision.allowed {
            warn!(ip = ip_address, "Login rate limit hit");
            return Err(AppError::rate_limited(
                "Too many login attempts. Please try again later.",
            ));
        }

        let mut user = match self.users.find_by_email(email, tenant_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(AppError::invalid_credentials()),
            Err(e) => {
                error!(error = %e, "User lookup failed during login");
                return Err(AppError::authentication_failed());
            }
        };

        self.account.check_status(&user)?;

        let password_ok = match self
            .account
            .hasher()
            .verify_password(password, &user.password_hash)
        {
            Ok(ok) => ok,
            Err(e) => {
                error!(user_id = %user.id, error = %e, "Password verification failed");
                return Err(AppError::authentication_failed());
            }
        };
        if !password_ok {
            let locked = self.account.process_failed_login(&mut user);
            if let Err(e) = self.users.save(&user).await {
                error!(user_id = %user.id, error = %e, "Failed to persist failed-attempt counter");
            }
            if locked {
                info!(user_id = %user.id, "Login attempt on newly locked account");
            }
            return Err(AppError::invalid_credentials());
        }

        self.account.process_successful_login(&mut user);
        if let Err(e) = self.users.save(&user).await {
            error!(user_id = %user.id, error = %e, "Failed to persist login bookkeeping");
            return Err(AppError::authentication_failed());
        }

        let tokens = match self.account.create_auth_tokens(&user) {
            Ok(tokens) => tokens,
            Err(e) => {
                error!(user_id = %user.id, error = %e, "Token issuance failed");
                return Err(AppError::authentication_failed());
            }
        };

        if let Err(e) = self.register_pair(&user, &tokens).await {
            error!(user_id = %user.id, error = %e, "Token index registration failed");
            return Err(AppError::authentication_failed());
        }

        let session = match self
            .sessions
            .create_session(&user, &tokens, ip_address, user_agent)
            .await
        {
            Ok(session) => session,
            Err(e) => {
                error!(user_id = %user.id, error = %e, "Session persistence failed");
                // The pair is already live; kill both halves before bailing.
                self.best_effort_revoke(&user, &tokens).await;
                return Err(AppError::authentication_failed());
            }
        };

        info!(user_id = %user.id, session_id = %session.id, "Login succeeded");
        Ok(LoginResult {
            mfa_required: self.require_mfa || user.require_mfa,
            tokens,
            session,
            user,
        })
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// With `rotate` set, the refresh token is replaced as well and the
    /// old one revoked; otherwise the same refresh token remains valid
    /// and is returned unchanged in the pair.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        ip_address: &str,
        rotate: bool,
    ) -> AppResult<TokenPair> {
        let decision = self
            .limiter
            .check(ip_address, RateLimitClass::RefreshToken)
            .await?;
        if !decision.allowed {
            warn!(ip = ip_address, "Refresh rate limit hit");
            return Err(AppError::rate_limited(
                "Too many refresh attempts. Please try again later.",
            ));
        }

        let claims = self.decoder.verify_refresh(refresh_token)?;
        if self.revocation.is_revoked(&claims.jti).await {
            return Err(AppError::token_revoked());
        }

        // Roles/permissions/status may have changed since issuance; the
        // new access token reflects the current user record.
        let user = match self.users.find_by_id(claims.user_id(), claims.tenant_id()).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(user_id = %claims.user_id(), "Refresh for a user that no longer exists");
                return Err(AppError::authentication_failed());
            }
            Err(e) => {
                error!(error = %e, "User lookup failed during refresh");
                return Err(AppError::authentication_failed());
            }
        };
        self.account.check_status(&user)?;

        if rotate {
            let tokens = self.account.create_auth_tokens(&user)?;
            self.register_pair(&user, &tokens).await?;
            self.revocation
                .revoke(
                    &claims.jti,
                    user.id,
                    user.tenant_id,
                    claims.expires_at(),
                    RevocationReason::Logout,
                )
                .await?;

            if let Some(mut session) = self
                .sessions
                .find_by_token(refresh_token, user.tenant_id)
                .await?
            {
                self.sessions.rebind_tokens(&mut session, &tokens).await?;
            }

            info!(user_id = %user.id, "Refresh token rotated");
            return Ok(tokens);
        }

        let access = self.account.create_access_token(&user)?;
        self.revocation
            .register(&access.jti, user.id, user.tenant_id, access.expires_at)
            .await?;
        self.sessions
            .rebind_access_token(refresh_token, user.tenant_id, &access.token)
            .await?;

        Ok(TokenPair {
            access_token: access.token,
            access_expires_at: access.expires_at,
            access_jti: access.jti,
            refresh_token: refresh_token.to_string(),
            refresh_expires_at: claims.expires_at(),
            refresh_jti: claims.jti,
        })
    }

    /// Logs out by revoking the presented access token and closing its
    /// session. With `revoke_all`, every token and session the user holds
    /// is revoked (reason Security).
    ///
    /// Logging out with an already-expired token succeeds as a no-op:
    /// there is nothing left to revoke.
    pub async fn logout(&self, access_token: &str, revoke_all: bool) -> AppResult<()> {
        let claims = match self.decoder.verify_access(access_token) {
            Ok(claims) => claims,
            Err(e) if e.kind == ErrorKind::TokenExpired => return Ok(()),
            Err(e) => return Err(e),
        };

        self.revocation
            .revoke(
                &claims.jti,
                claims.user_id(),
                claims.tenant_id(),
                claims.expires_at(),
                RevocationReason::Logout,
            )
            .await?;
        self.sessions
            .deactivate_by_token(access_token, claims.tenant_id())
            .await?;

        if revoke_all {
            let revoked = self
                .revocation
                .revoke_all_for_user(claims.user_id(), claims.tenant_id())
                .await?;
            let removed = self
                .sessions
                .delete_all_for_user(claims.user_id(), claims.tenant_id())
                .await?;
            info!(
                user_id = %claims.user_id(),
                tokens = revoked,
                sessions = removed,
                "Full logout completed"
            );
        } else {
            info!(user_id = %claims.user_id(), "Logout completed");
        }
        Ok(())
    }

    /// Registers both halves of a pair in the user token index.
    async fn register_pair(&self, user: &User, tokens: &TokenPair) -> AppResult<()> {
        self.revocation
            .register(
                &tokens.access_jti,
                user.id,
                user.tenant_id,
                tokens.access_expires_at,
            )
            .await?;
        self.revocation
            .register(
                &tokens.refresh_jti,
                user.id,
                user.tenant_id,
                tokens.refresh_expires_at,
            )
            .await
    }

    /// Revokes both halves of a pair, logging failures instead of
    /// propagating them: the caller is already on an error path.
    async fn best_effort_revoke(&self, user: &User, tokens: &TokenPair) {
        for (jti, expires_at) in [
            (&tokens.access_jti, tokens.access_expires_at),
            (&tokens.refresh_jti, tokens.refresh_expires_at),
        ] {
            if let Err(e) = self
                .revocation
                .revoke(jti, user.id, user.tenant_id, expires_at, RevocationReason::Security)
                .await
            {
                error!(user_id = %user.id, jti, error = %e, "Cleanup revocation failed");
            }
        }
    }
}
