//! # sentra-entity
//!
//! Domain models for the Sentra identity platform, plus the tenant-scoped
//! persistence traits implemented by external storage collaborators.
//! Every query is implicitly filtered by tenant id; cross-tenant leakage
//! is a correctness bug.

pub mod otp;
pub mod repository;
pub mod session;
pub mod user;

pub use otp::{Otp, OtpKind};
pub use repository::{OtpRepository, SessionRepository, UserRepository};
pub use session::Session;
pub use user::{User, UserStatus};
