//! # sentra-auth
//!
//! The authentication/authorization core of the Sentra platform.
//!
//! ## Modules
//!
//! - `jwt` — token pair issuance, verification, and claims
//! - `revocation` — per-token blacklisting with cascading per-user revocation
//! - `ratelimit` — sliding-window counters with escalating blocks
//! - `password` — Argon2id hashing and password strength policy
//! - `account` — credential validation, lockout, and login bookkeeping
//! - `authz` — permission/role evaluation with wildcard and hierarchy rules
//! - `otp` — one-time code issuance and verification
//! - `session` — login/logout/refresh orchestration and session persistence
//! - `guard` — per-request enforcement producing an identity context

pub mod account;
pub mod authz;
pub mod guard;
pub mod jwt;
pub mod otp;
pub mod password;
pub mod ratelimit;
pub mod revocation;
pub mod session;

pub use account::AccountService;
pub use authz::{AccessDecision, Permission, PermissionEvaluator};
pub use guard::{GuardConfig, IdentityContext, RequestGuard};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenClass, TokenPair};
pub use otp::OtpService;
pub use password::{PasswordHasher, PasswordStrength, PasswordValidator};
pub use ratelimit::{RateLimitClass, RateLimitDecision, RateLimiter};
pub use revocation::{RevocationReason, RevocationStore};
pub use session::{LoginResult, SessionManager, SessionStore};
