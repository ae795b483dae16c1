//! JWT token encoding, decoding, and claims management.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{Claims, TokenClass};
pub use decoder::JwtDecoder;
pub use encoder::{IssuedToken, JwtEncoder, TokenPair};
