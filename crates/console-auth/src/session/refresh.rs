//! Single-flight silent renewal.

use std::sync::{Arc, Mutex, MutexGuard};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, error, info, warn};

use console_core::error::AppError;
use console_core::result::AppResult;
use console_core::traits::TokenResponse;

use crate::jwt::{AuthState, Claims};

use super::shared::SessionCore;
use super::state::SessionPhase;

/// Result of a silent renewal, shared by every caller that joined it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new token was installed.
    Renewed(AuthState),
    /// Renewal failed and the session was ended.
    Failed,
    /// The session was disposed or logged out while the call was
    /// outstanding; the result was dropped.
    Discarded,
}

impl RefreshOutcome {
    /// Whether a new token was installed.
    pub fn is_renewed(&self) -> bool {
        matches!(self, Self::Renewed(_))
    }
}

type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Slot for the renewal currently in flight.
#[derive(Default)]
pub(crate) struct InFlight {
    slot: Mutex<Option<SharedRefresh>>,
}

impl std::fmt::Debug for InFlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlight")
            .field("active", &self.is_active())
            .finish()
    }
}

impl InFlight {
    pub(crate) fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<SharedRefresh>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Empties the in-flight slot when the renewal task ends, including when
/// it panics or is aborted.
struct FlightGuard<'a>(&'a InFlight);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.lock().take();
    }
}

impl SessionCore {
    /// Renews the token using the ambient server-side session.
    ///
    /// At most one renewal call is outstanding; a caller arriving while one
    /// is in flight awaits that call's outcome instead of starting another.
    /// The renewal runs on its own task and completes even if every caller
    /// stops waiting.
    pub(crate) async fn silent_refresh(self: &Arc<Self>) -> RefreshOutcome {
        let pending = {
            let mut slot = self.inflight.lock();
            match slot.as_ref() {
                Some(existing) => {
                    debug!("Renewal already in flight, joining it");
                    existing.clone()
                }
                None => {
                    // The slot stays locked until the shared future is
                    // stored, so the task's guard cannot clear it early.
                    let core = Arc::clone(self);
                    let epoch = self.epoch();
                    let handle = tokio::spawn(async move { core.run_refresh().await });
                    let core = Arc::clone(self);
                    let shared = async move {
                        match handle.await {
                            Ok(outcome) => outcome,
                            Err(e) => {
                                error!(error = %e, "Renewal task did not complete");
                                core.abandon_refresh(epoch)
                            }
                        }
                    }
                    .boxed()
                    .shared();
                    *slot = Some(shared.clone());
                    shared
                }
            }
        };

        pending.await
    }

    async fn run_refresh(self: Arc<Self>) -> RefreshOutcome {
        let _flight = FlightGuard(&self.inflight);
        let epoch = self.epoch();

        if self.store.phase() == SessionPhase::Authenticated {
            self.store.set_phase(SessionPhase::Refreshing);
        }

        let response = self.api.refresh().await;

        if self.epoch() != epoch || self.is_disposed() {
            debug!("Session ended while renewal was outstanding, discarding result");
            return RefreshOutcome::Discarded;
        }

        let outcome = match self.accept_renewal(response) {
            Ok((token, claims)) => {
                let auth = self.install(&token, &claims);
                info!(email = %auth.email, role = %auth.role, "Session renewed");
                RefreshOutcome::Renewed(auth)
            }
            Err(e) => {
                warn!(error = %e, "Silent refresh failed, ending session");
                self.teardown();
                RefreshOutcome::Failed
            }
        };

        self.store.mark_ready();
        outcome
    }

    /// Ends the session after a renewal task died without an outcome,
    /// unless the session it belonged to is already gone.
    fn abandon_refresh(&self, epoch: u64) -> RefreshOutcome {
        if self.epoch() != epoch || self.is_disposed() {
            return RefreshOutcome::Discarded;
        }
        self.teardown();
        self.store.mark_ready();
        RefreshOutcome::Failed
    }

    /// Turns a renewal response into a usable token and its claims.
    fn accept_renewal(&self, response: AppResult<TokenResponse>) -> AppResult<(String, Claims)> {
        let token = response?
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::session("Renewal response did not include a token"))?;
        let claims = self.decoder.decode(&token)?;
        Ok((token, claims))
    }
}
