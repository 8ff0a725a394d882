//! REST authentication operations consumed by the session manager.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Body returned by the login and refresh endpoints.
///
/// The token is optional on the wire: a response that omits it is a
/// renewal failure, not a decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Freshly issued bearer token, if the backend provided one.
    #[serde(default)]
    pub token: Option<String>,
}

impl TokenResponse {
    /// A response carrying the given token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

/// Network operations against the backend's auth endpoints.
///
/// Implementations are opaque to the session manager; it only observes
/// success, failure, and the returned token.
#[async_trait]
pub trait AuthApi: Send + Sync + std::fmt::Debug + 'static {
    /// Exchange credentials for a token. Fails with a displayable message
    /// when the credentials are rejected.
    async fn login(&self, email: &str, password: &str) -> AppResult<TokenResponse>;

    /// Obtain a new token using the ambient server-side session.
    async fn refresh(&self) -> AppResult<TokenResponse>;

    /// End the server-side session. Best-effort from the caller's side.
    async fn logout(&self) -> AppResult<()>;
}
