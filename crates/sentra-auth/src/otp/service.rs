//! One-time code generation and verification.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use sentra_core::error::AppError;
use sentra_core::result::AppResult;
use sentra_entity::otp::{Otp, OtpKind};
use sentra_entity::repository::OtpRepository;

use crate::ratelimit::{RateLimitClass, RateLimiter};

/// Code lifetime.
const OTP_TTL_MINUTES: i64 = 10;
/// Verification attempts allowed per code.
const MAX_ATTEMPTS: i32 = 5;

/// Issues and verifies six-digit one-time codes.
///
/// Delivery (email/SMS) is out of scope; callers take the generated code
/// and hand it to their delivery channel.
#[derive(Debug, Clone)]
pub struct OtpService {
    repository: Arc<dyn OtpRepository>,
    /// Gates issuance per email when present.
    limiter: Option<RateLimiter>,
}

impl OtpService {
    /// Creates a new OTP service over the given store, with no issuance
    /// rate limiting.
    pub fn new(repository: Arc<dyn OtpRepository>) -> Self {
        Self {
            repository,
            limiter: None,
        }
    }

    /// Adds an issuance rate limit, keyed by email and classed by the
    /// code's purpose.
    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    fn issuance_class(kind: OtpKind) -> RateLimitClass {
        match kind {
            OtpKind::PasswordReset => RateLimitClass::PasswordReset,
            OtpKind::AccountActivation | OtpKind::TwoFactor => RateLimitClass::OtpRequest,
        }
    }

    /// Generates and persists a fresh six-digit code for the email.
    ///
    /// A new code supersedes any earlier one of the same kind: lookups
    /// return the most recent record, so the old code stops verifying.
    pub async fn generate(&self, email: &str, tenant_id: Uuid, kind: OtpKind) -> AppResult<Otp> {
        let email = email.to_lowercase();

        if let Some(limiter) = &self.limiter {
            let decision = limiter.check(&email, Self::issuance_class(kind)).await?;
            if !decision.allowed {
                warn!(email, kind = %kind, "One-time code issuance rate limit hit");
                return Err(AppError::rate_limited(
                    "Too many code requests. Please try again later.",
                ));
            }
        }

        let code = format!("{:06}", rand::rng().random_range(0..1_000_000u32));
        let now = Utc::now();

        let otp = Otp {
            id: Uuid::new_v4(),
            tenant_id,
            email,
            code,
            kind,
            expires_at: now + Duration::minutes(OTP_TTL_MINUTES),
            is_used: false,
            attempts: 0,
            max_attempts: MAX_ATTEMPTS,
            created_at: now,
        };

        self.repository.save(&otp).await?;
        info!(email = %otp.email, kind = %kind, "One-time code issued");
        Ok(otp)
    }

    /// Verifies a submitted code.
    ///
    /// A code that is missing, used, expired, or out of attempts fails
    /// without touching the attempt counter. Otherwise the attempt is
    /// counted (and persisted) whether or not the code matches; a match
    /// additionally marks the code used.
    pub async fn verify(
        &self,
        email: &str,
        tenant_id: Uuid,
        kind: OtpKind,
        submitted: &str,
    ) -> AppResult<bool> {
        let email = email.to_lowercase();
        let Some(mut otp) = self.repository.find_by_email(&email, tenant_id, kind).await? else {
            debug!(email, kind = %kind, "No one-time code on record");
            return Ok(false);
        };

        if !otp.is_valid() {
            debug!(email, kind = %kind, "One-time code no longer valid");
            return Ok(false);
        }

        otp.attempts += 1;
        let matches = otp.code == submitted;
        if matches {
            otp.is_used = true;
        }
        self.repository.save(&otp).await?;

        if matches {
            info!(email, kind = %kind, "One-time code verified");
        } else {
            debug!(email, kind = %kind, attempts = otp.attempts, "One-time code mismatch");
        }
        Ok(matches)
    }
}
