//! Public facade over the session components.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use console_core::config::SessionConfig;
use console_core::error::AppError;
use console_core::result::AppResult;
use console_core::traits::{AuthApi, Clock, Navigator, SystemClock};

use crate::jwt::AuthState;

use super::policy::ExpiryPolicy;
use super::refresh::RefreshOutcome;
use super::shared::SessionCore;
use super::state::{SessionPhase, SessionSnapshot};
use super::visibility::{self, VisibilityHandle};

/// Client-side authentication session.
///
/// One instance per running console. The UI calls [`SessionManager::start`]
/// when the authenticated area mounts and [`SessionManager::dispose`] when
/// it unmounts, and reads the session through [`SessionManager::snapshot`]
/// or [`SessionManager::subscribe`].
pub struct SessionManager {
    /// Shared component state.
    core: Arc<SessionCore>,
    /// Visibility reports from the UI shell.
    visibility: VisibilityHandle,
    /// Watcher task started by `start()`.
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("snapshot", &self.snapshot())
            .field("policy", &self.core.policy)
            .finish()
    }
}

impl SessionManager {
    /// Creates a manager using the system clock.
    pub fn new(
        api: Arc<dyn AuthApi>,
        navigator: Arc<dyn Navigator>,
        config: &SessionConfig,
    ) -> Self {
        Self::with_clock(api, navigator, Arc::new(SystemClock), config)
    }

    /// Creates a manager with an explicit clock.
    pub fn with_clock(
        api: Arc<dyn AuthApi>,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
        config: &SessionConfig,
    ) -> Self {
        let policy = ExpiryPolicy::from_config(config);
        Self {
            core: Arc::new(SessionCore::new(api, navigator, clock, policy)),
            visibility: VisibilityHandle::new(),
            watcher: Mutex::new(None),
        }
    }

    /// Initialises the session.
    ///
    /// Consumes a handoff token from navigation history when one is present
    /// and usable; otherwise asks the backend for a token via the ambient
    /// session. Starts watching visibility changes. Returns the phase the
    /// session settled in.
    pub async fn start(&self) -> SessionPhase {
        self.core.set_disposed(false);
        self.core.store.set_phase(SessionPhase::Initializing);
        self.start_watcher();

        if let Some(token) = self.core.navigator.take_handoff() {
            if self.core.apply_token(&token) {
                info!("Session initialised from handoff token");
                return self.phase();
            }
            warn!("Handoff token unusable, falling back to silent refresh");
        }

        // A renewal left over from before a dispose() is joined here and
        // reports Discarded; by then it has finished, so run a fresh one.
        if self.core.silent_refresh().await == RefreshOutcome::Discarded {
            self.core.silent_refresh().await;
        }
        self.phase()
    }

    /// Stops all background activity: cancels the renewal timer and the
    /// visibility watcher. A renewal still in flight finishes but its
    /// result is dropped. The manager may be started again.
    pub fn dispose(&self) {
        self.core.set_disposed(true);
        self.core.bump_epoch();
        self.core.scheduler.clear();
        let watcher = self
            .watcher
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(watcher) = watcher {
            watcher.abort();
        }
        debug!("Session manager disposed");
    }

    /// Signs in with credentials and installs the returned token.
    ///
    /// The error message is suitable for display. A failed login leaves the
    /// current session as it was.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthState> {
        let response = self.core.api.login(email, password).await.map_err(|e| {
            warn!(email = %email, error = %e, "Login rejected");
            e
        })?;

        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("Login response did not include a token"))?;
        let claims = self.core.decoder.decode(&token)?;

        // A renewal still outstanding belongs to the previous session.
        self.core.bump_epoch();
        let auth = self.core.install(&token, &claims);
        self.core.store.mark_ready();
        info!(email = %auth.email, role = %auth.role, "Logged in");
        Ok(auth)
    }

    /// Ends the session on the backend (best-effort) and locally, then
    /// redirects to login.
    pub async fn logout(&self) {
        if let Err(e) = self.core.api.logout().await {
            warn!(error = %e, "Logout request failed, clearing local session anyway");
        }
        self.core.bump_epoch();
        self.core.teardown();
        info!("Logged out");
    }

    /// Applies a token obtained out-of-band. Returns `false` and leaves the
    /// session untouched when the token cannot be decoded or the manager is
    /// disposed.
    pub fn apply_token(&self, token: &str) -> bool {
        self.core.apply_token(token)
    }

    /// Renews the token now, joining a renewal already in flight.
    pub async fn silent_refresh(&self) -> RefreshOutcome {
        self.core.silent_refresh().await
    }

    /// Runs the foreground check directly, as the visibility watcher does
    /// on a Hidden → Visible transition. Returns `None` when no renewal was
    /// needed.
    pub async fn on_foreground(&self) -> Option<RefreshOutcome> {
        self.core.on_foreground().await
    }

    /// Schedules renewal of `token`, replacing any pending timer.
    pub fn schedule_refresh(&self, token: &str) {
        self.core.schedule_refresh(token);
    }

    /// Cancels the pending renewal timer. Safe when none is pending.
    pub fn clear_refresh_timer(&self) {
        self.core.scheduler.clear();
    }

    /// Handle for reporting UI visibility changes.
    pub fn visibility(&self) -> VisibilityHandle {
        self.visibility.clone()
    }

    /// Current session record.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.core.store.snapshot()
    }

    /// Receiver that observes every session transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.core.store.subscribe()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.core.store.phase()
    }

    /// Current bearer token, for attaching to API requests.
    pub fn token(&self) -> Option<String> {
        self.core.store.token()
    }

    /// Identity of the signed-in user.
    pub fn auth_state(&self) -> Option<AuthState> {
        self.core.store.snapshot().auth
    }

    /// Whether the first session resolution has finished.
    pub fn is_ready(&self) -> bool {
        self.core.store.snapshot().ready
    }

    /// Whether a renewal call is outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.core.inflight.is_active()
    }

    /// Whether a renewal timer is pending.
    pub fn has_pending_refresh(&self) -> bool {
        self.core.scheduler.is_pending()
    }

    /// Delay the pending renewal timer was armed with.
    pub fn pending_refresh_delay(&self) -> Option<Duration> {
        self.core.scheduler.pending_delay()
    }

    fn start_watcher(&self) {
        let mut watcher = self.watcher.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = watcher.take() {
            previous.abort();
        }
        *watcher = Some(visibility::spawn_watcher(
            Arc::downgrade(&self.core),
            self.visibility.returns(),
        ));
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.dispose();
    }
}
