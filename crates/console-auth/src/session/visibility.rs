//! Renewal checks when the UI returns to the foreground.

use std::sync::{Arc, Mutex, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use super::refresh::RefreshOutcome;
use super::shared::SessionCore;
use super::state::SessionPhase;

/// Foreground state of the hosting UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// In the foreground.
    Visible,
    /// Backgrounded or minimised.
    Hidden,
}

/// Feeds visibility changes to a running session manager.
///
/// Edges are detected when reported: every Hidden → Visible change bumps a
/// counter that the watcher task observes.
#[derive(Debug, Clone)]
pub struct VisibilityHandle {
    tracker: Arc<Tracker>,
}

#[derive(Debug)]
struct Tracker {
    /// Last reported state.
    current: Mutex<Visibility>,
    /// Number of foreground returns reported so far.
    returns: watch::Sender<u64>,
}

impl VisibilityHandle {
    pub(crate) fn new() -> Self {
        let (returns, _rx) = watch::channel(0);
        Self {
            tracker: Arc::new(Tracker {
                current: Mutex::new(Visibility::Visible),
                returns,
            }),
        }
    }

    /// Reports a visibility change. Returns `true` when it was a return to
    /// the foreground.
    pub fn set(&self, visibility: Visibility) -> bool {
        let returned = {
            let mut current = self
                .tracker
                .current
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            let returned = *current == Visibility::Hidden && visibility == Visibility::Visible;
            *current = visibility;
            returned
        };
        if returned {
            self.tracker.returns.send_modify(|n| *n += 1);
        }
        returned
    }

    /// Reports that the UI went to the background.
    pub fn hidden(&self) -> bool {
        self.set(Visibility::Hidden)
    }

    /// Reports that the UI came back to the foreground.
    pub fn visible(&self) -> bool {
        self.set(Visibility::Visible)
    }

    /// Receiver that sees foreground returns reported from now on.
    pub(crate) fn returns(&self) -> watch::Receiver<u64> {
        self.tracker.returns.subscribe()
    }
}

/// Spawns the task that turns foreground returns into foreground checks.
///
/// `returns` must be subscribed before the caller yields, so a return
/// reported right after `start()` is not missed.
pub(crate) fn spawn_watcher(
    session: Weak<SessionCore>,
    mut returns: watch::Receiver<u64>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while returns.changed().await.is_ok() {
            returns.borrow_and_update();
            let Some(core) = session.upgrade() else {
                break;
            };
            debug!("UI returned to foreground");
            core.on_foreground().await;
        }
    })
}

impl SessionCore {
    /// Renews when no token is held or the held one is expiring soon.
    ///
    /// Does nothing once the session has ended or been disposed. Runs
    /// through the single-flight renewal, so it never adds a second call to
    /// one already outstanding.
    pub(crate) async fn on_foreground(self: &Arc<Self>) -> Option<RefreshOutcome> {
        if self.is_disposed() || self.store.phase() == SessionPhase::Unauthenticated {
            debug!("Session inactive, skipping foreground check");
            return None;
        }

        let needs_refresh = match self.store.token() {
            None => true,
            Some(token) => match self.decoder.decode(&token) {
                Ok(claims) => self.policy.is_expiring_soon(&claims, self.now()),
                Err(_) => true,
            },
        };

        if !needs_refresh {
            return None;
        }

        debug!("Held token missing or expiring, renewing");
        Some(self.silent_refresh().await)
    }
}
