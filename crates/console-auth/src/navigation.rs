//! In-memory navigation history with a one-time token handoff slot.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use console_core::traits::Navigator;

/// Payload attached to a single navigation entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffPayload {
    /// Token handed over by the page that navigated here, if any.
    #[serde(default)]
    pub token: Option<String>,
}

/// Navigation history that outlives individual session manager instances.
///
/// A manager created after a "reload" shares the same history, so a
/// handoff payload consumed once is gone for every later reader.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    /// State of the current history entry.
    entry: Mutex<Option<HandoffPayload>>,
    /// Number of redirects to the login entry point.
    redirects: AtomicUsize,
}

impl MemoryNavigator {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history whose current entry carries `token`.
    pub fn with_handoff(token: impl Into<String>) -> Self {
        let navigator = Self::new();
        navigator.push_handoff(token);
        navigator
    }

    /// Navigates to a new entry carrying `token` as its handoff payload.
    pub fn push_handoff(&self, token: impl Into<String>) {
        let mut entry = self.entry.lock().unwrap_or_else(|e| e.into_inner());
        *entry = Some(HandoffPayload {
            token: Some(token.into()),
        });
    }

    /// Whether the current entry still carries a payload.
    pub fn has_handoff(&self) -> bool {
        let entry = self.entry.lock().unwrap_or_else(|e| e.into_inner());
        entry.as_ref().is_some_and(|p| p.token.is_some())
    }

    /// Number of times the session manager asked for the login page.
    pub fn redirect_count(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for MemoryNavigator {
    fn take_handoff(&self) -> Option<String> {
        let mut entry = self.entry.lock().unwrap_or_else(|e| e.into_inner());
        let token = entry.take().and_then(|payload| payload.token);
        if token.is_some() {
            debug!("Consumed handoff token and erased it from history");
        }
        token
    }

    fn redirect_to_login(&self) {
        let count = self.redirects.fetch_add(1, Ordering::SeqCst) + 1;
        info!(redirects = count, "Redirecting to login");
    }
}
