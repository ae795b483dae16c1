//! One-time code issuance and verification.

pub mod service;

pub use service::OtpService;
