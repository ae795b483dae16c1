//! Token revocation ("blacklist") tracking.

pub mod entry;
pub mod store;

pub use entry::{RevocationEntry, RevocationReason};
pub use store::RevocationStore;
