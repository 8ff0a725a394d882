//! The authoritative in-memory session record.

use serde::Serialize;
use tokio::sync::watch;

use crate::jwt::{AuthState, Claims};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// `start()` has not been called.
    Uninitialized,
    /// Waiting on the handoff token or the first renewal.
    Initializing,
    /// A usable token is held.
    Authenticated,
    /// A renewal call is in flight.
    Refreshing,
    /// The session ended; the UI has been sent to login.
    Unauthenticated,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Initializing => write!(f, "initializing"),
            Self::Authenticated => write!(f, "authenticated"),
            Self::Refreshing => write!(f, "refreshing"),
            Self::Unauthenticated => write!(f, "unauthenticated"),
        }
    }
}

/// Read-only view of the session published to consumers.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Current bearer token.
    pub token: Option<String>,
    /// Identity derived from the token's claims.
    pub auth: Option<AuthState>,
    /// Set once the first session resolution finished, whatever its outcome.
    pub ready: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
            token: None,
            auth: None,
            ready: false,
        }
    }
}

impl std::fmt::Debug for SessionSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSnapshot")
            .field("phase", &self.phase)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("auth", &self.auth)
            .field("ready", &self.ready)
            .finish()
    }
}

impl SessionSnapshot {
    /// Whether a token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Owner of the session record. Every mutation goes through here and is
/// broadcast to subscribers.
#[derive(Debug)]
pub(crate) struct SessionStore {
    tx: watch::Sender<SessionSnapshot>,
}

impl SessionStore {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self { tx }
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    pub(crate) fn token(&self) -> Option<String> {
        self.tx.borrow().token.clone()
    }

    pub(crate) fn phase(&self) -> SessionPhase {
        self.tx.borrow().phase
    }

    /// Replaces token and identity together.
    pub(crate) fn replace(&self, token: &str, claims: &Claims) -> AuthState {
        let auth = claims.auth_state();
        self.tx.send_modify(|s| {
            s.token = Some(token.to_string());
            s.auth = Some(auth.clone());
            s.phase = SessionPhase::Authenticated;
        });
        auth
    }

    /// Drops token and identity and marks the session ended.
    pub(crate) fn clear(&self) {
        self.tx.send_modify(|s| {
            s.token = None;
            s.auth = None;
            s.phase = SessionPhase::Unauthenticated;
        });
    }

    pub(crate) fn set_phase(&self, phase: SessionPhase) {
        self.tx.send_if_modified(|s| {
            if s.phase == phase {
                return false;
            }
            s.phase = phase;
            true
        });
    }

    pub(crate) fn mark_ready(&self) {
        self.tx.send_if_modified(|s| {
            if s.ready {
                return false;
            }
            s.ready = true;
            true
        });
    }
}
