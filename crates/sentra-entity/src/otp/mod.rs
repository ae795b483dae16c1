//! One-time code entity.

pub mod model;

pub use model::{Otp, OtpKind};
