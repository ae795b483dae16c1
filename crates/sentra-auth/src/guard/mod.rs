//! Per-request enforcement: token verification, blacklist and rate limit
//! checks, and permission gating, producing an identity context.

pub mod config;
#[allow(clippy::module_inception)]
pub mod guard;

pub use config::GuardConfig;
pub use guard::{IdentityContext, RequestGuard};
