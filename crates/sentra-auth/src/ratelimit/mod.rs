//! Sliding-window rate limiting with escalating blocks.

pub mod class;
pub mod limiter;

pub use class::RateLimitClass;
pub use limiter::{RateLimitDecision, RateLimiter};
