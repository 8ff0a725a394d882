//! Installs tokens obtained outside the renewal path.

use std::sync::Arc;

use tracing::{info, warn};

use crate::jwt::{AuthState, Claims};

use super::shared::SessionCore;

impl SessionCore {
    /// Replaces the session with `token` and schedules its renewal.
    ///
    /// Both the renewal path and the apply path end here, so whichever
    /// writes last wins with a complete token/identity pair.
    pub(crate) fn install(self: &Arc<Self>, token: &str, claims: &Claims) -> AuthState {
        let auth = self.store.replace(token, claims);
        self.schedule_after_install(claims);
        auth
    }

    /// Applies a token from login or a navigation handoff.
    ///
    /// Returns `false`, leaving the session untouched, when the token
    /// cannot be decoded or the session is disposed. A renewal still
    /// outstanding belongs to the replaced session and its result is
    /// dropped.
    pub(crate) fn apply_token(self: &Arc<Self>, token: &str) -> bool {
        if self.is_disposed() {
            warn!("Session disposed, ignoring applied token");
            return false;
        }

        match self.decoder.decode(token) {
            Ok(claims) => {
                self.bump_epoch();
                let auth = self.install(token, &claims);
                self.store.mark_ready();
                info!(email = %auth.email, role = %auth.role, "Applied session token");
                true
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unusable session token");
                false
            }
        }
    }
}
