//! Session lifecycle: hold the current token, renew it before it expires,
//! and end the session when renewal fails.
//!
//! [`SessionManager`] is the only public entry point. The pieces behind it:
//!
//! - `state` — the published session record
//! - `policy` — expiry and delay arithmetic
//! - `timer` / `scheduler` — the single pending renewal timer
//! - `refresh` — single-flight silent renewal
//! - `applier` — installing tokens obtained out-of-band
//! - `visibility` — renewal checks when the UI returns to the foreground

mod applier;
mod manager;
mod policy;
mod refresh;
mod scheduler;
mod shared;
mod state;
mod timer;
mod visibility;

pub use manager::SessionManager;
pub use policy::ExpiryPolicy;
pub use refresh::RefreshOutcome;
pub use state::{SessionPhase, SessionSnapshot};
pub use timer::ScheduledTask;
pub use visibility::{Visibility, VisibilityHandle};
