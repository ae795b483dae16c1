//! Login/refresh/logout orchestration and session persistence.

pub mod manager;
pub mod store;

pub use manager::{LoginResult, SessionManager};
pub use store::SessionStore;
