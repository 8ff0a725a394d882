//! Token claims and decoding.

pub mod claims;
pub mod decoder;

pub use claims::{AuthState, Claims};
pub use decoder::{ClaimsDecoder, DecodeError};
