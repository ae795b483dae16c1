//! Request guard composing the verification pipeline.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use sentra_core::error::AppError;
use sentra_core::result::AppResult;

use crate::authz::{Permission, PermissionEvaluator};
use crate::jwt::{Claims, JwtDecoder, TokenClass};
use crate::ratelimit::RateLimiter;
use crate::revocation::RevocationStore;

use super::config::GuardConfig;

/// The authenticated identity attached to a request after the guard
/// passes. Built from token claims; no repository round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityContext {
    /// Authenticated user.
    pub user_id: Uuid,
    /// Tenant scope.
    pub tenant_id: Uuid,
    /// Email at token issuance.
    pub email: String,
    /// Username at token issuance.
    pub username: String,
    /// Roles at token issuance.
    pub roles: Vec<String>,
    /// Permission strings at token issuance.
    pub permissions: Vec<String>,
    /// Token id, for downstream revocation.
    pub jti: String,
    /// Class of the presented token.
    pub token_class: TokenClass,
}

impl From<Claims> for IdentityContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            tenant_id: claims.org_id,
            email: claims.email,
            username: claims.username,
            roles: claims.roles,
            permissions: claims.permissions,
            jti: claims.jti,
            token_class: claims.token_type,
        }
    }
}

/// Verifies and authorizes individual requests.
#[derive(Debug, Clone)]
pub struct RequestGuard {
    decoder: JwtDecoder,
    revocation: RevocationStore,
    limiter: RateLimiter,
    evaluator: PermissionEvaluator,
    config: GuardConfig,
}

impl RequestGuard {
    /// Creates a guard with the given behavior profile.
    pub fn new(
        decoder: JwtDecoder,
        revocation: RevocationStore,
        limiter: RateLimiter,
        config: GuardConfig,
    ) -> Self {
        Self {
            decoder,
            revocation,
            limiter,
            evaluator: PermissionEvaluator::new(),
            config,
        }
    }

    /// Runs the full check pipeline against an `Authorization` header.
    ///
    /// Order: bearer extraction, signature/expiry verification, blacklist,
    /// per-user rate limit, then permissions. Returns `Ok(None)` only for
    /// an anonymous pass on a route with `require_auth` disabled.
    pub async fn authorize(
        &self,
        authorization: Option<&str>,
        required: &[Permission],
    ) -> AppResult<Option<IdentityContext>> {
        self.authorize_with_roles(authorization, required, &[]).await
    }

    /// Like [`Self::authorize`], additionally requiring at least one of
    /// the given roles. A role miss surfaces as `InsufficientRole`,
    /// distinct from a permission miss.
    pub async fn authorize_with_roles(
        &self,
        authorization: Option<&str>,
        required: &[Permission],
        required_roles: &[&str],
    ) -> AppResult<Option<IdentityContext>> {
        let Some(token) = authorization.and_then(extract_bearer) else {
            if self.config.require_auth {
                return Err(AppError::token_invalid("Missing or malformed bearer token"));
            }
            return Ok(None);
        };

        let claims = self.decoder.verify_access(token)?;

        if self.config.check_blacklist && self.revocation.is_revoked(&claims.jti).await {
            warn!(user_id = %claims.sub, jti = %claims.jti, "Revoked token presented");
            return Err(AppError::token_revoked());
        }

        if self.config.check_rate_limit {
            let decision = self
                .limiter
                .check(&claims.sub.to_string(), self.config.rate_limit_class)
                .await?;
            if !decision.allowed {
                warn!(user_id = %claims.sub, "Request rate limit hit");
                return Err(AppError::rate_limited(
                    "Rate limit exceeded. Please slow down.",
                ));
            }
        }

        if !required_roles.is_empty() {
            let decision = self
                .evaluator
                .check_roles_held(&claims.roles, required_roles);
            if !decision.is_authorized {
                debug!(
                    user_id = %claims.sub,
                    required = ?decision.required_permissions,
                    "Role check failed"
                );
                return Err(AppError::insufficient_role(
                    decision
                        .reason
                        .unwrap_or_else(|| "Insufficient role".to_string()),
                ));
            }
        }

        if !required.is_empty() {
            let decision = self.evaluator.evaluate_held(&claims.permissions, required);
            if !decision.is_authorized {
                debug!(
                    user_id = %claims.sub,
                    required = ?decision.required_permissions,
                    "Permission check failed"
                );
                return Err(AppError::insufficient_permissions(
                    decision
                        .reason
                        .unwrap_or_else(|| "Insufficient permissions".to_string()),
                ));
            }
        }

        Ok(Some(IdentityContext::from(claims)))
    }
}

/// Pulls the token out of a `Bearer <token>` header value.
fn extract_bearer(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}
