//! Permission and role evaluation.

pub mod evaluator;
pub mod permission;

pub use evaluator::{AccessDecision, PermissionEvaluator};
pub use permission::Permission;
