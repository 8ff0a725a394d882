//! Claims carried in a console access token.

use serde::{Deserialize, Serialize};

use crate::role::RoleLabel;

/// Claims payload embedded in every token issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Email of the authenticated user.
    pub email: String,
    /// Numeric role identifier.
    pub role_id: i64,
    /// Expiration timestamp (seconds since epoch), if the issuer set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Seconds left until `exp`, or `None` when the token carries no expiry.
    pub fn remaining_seconds(&self, now: i64) -> Option<i64> {
        self.exp.map(|exp| exp - now)
    }

    /// Projects the claims into the identity the UI renders.
    pub fn auth_state(&self) -> AuthState {
        AuthState {
            email: self.email.clone(),
            role: RoleLabel::from_role_id(self.role_id),
        }
    }
}

/// UI-facing identity derived from [`Claims`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// Email of the signed-in user.
    pub email: String,
    /// Role label used for UI gating.
    pub role: RoleLabel,
}
