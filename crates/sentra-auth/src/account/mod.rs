//! Account-level login bookkeeping: credential checks, lockout, and
//! status gating.

pub mod service;

pub use service::AccountService;
