//! Token claims extraction without signature verification.
//!
//! Tokens only ever reach the client as the body of a login or refresh
//! response from the backend, so the client reads the claims for UI gating
//! and renewal timing and leaves verification to the server.

use jsonwebtoken::dangerous::insecure_decode;
use thiserror::Error;

use console_core::error::AppError;

use super::claims::Claims;

/// Reasons a token could not be turned into [`Claims`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The token string was empty.
    #[error("token is empty")]
    Empty,
    /// The token is not a three-part compact token with base64 sections.
    #[error("malformed token: {0}")]
    Malformed(String),
    /// The payload parsed but lacks required claims or has wrong types.
    #[error("invalid token claims: {0}")]
    InvalidClaims(String),
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        AppError::with_source(
            console_core::error::ErrorKind::Validation,
            format!("Unusable token: {err}"),
            err,
        )
    }
}

/// Reads claims out of a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimsDecoder;

impl ClaimsDecoder {
    /// Creates a decoder that trusts the issuer.
    pub fn new() -> Self {
        Self
    }

    /// Extracts the claims embedded in `token`.
    ///
    /// Neither the signature nor any time-based claim is checked.
    pub fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DecodeError::Empty);
        }

        insecure_decode::<Claims>(token)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::Json(_) => {
                    DecodeError::InvalidClaims(e.to_string())
                }
                _ => DecodeError::Malformed(e.to_string()),
            })
    }
}
