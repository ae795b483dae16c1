//! # sentra-core
//!
//! Core crate for the Sentra identity platform. Contains configuration
//! schemas, the unified error system, telemetry setup, and the cache
//! provider trait shared by every other crate.
//!
//! This crate has **no** internal dependencies on other Sentra crates.

pub mod config;
pub mod error;
pub mod result;
pub mod telemetry;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
