//! # console-auth
//!
//! Client-side authentication session management for the network-core
//! console.
//!
//! ## Modules
//!
//! - `jwt` — claims decoding without signature verification
//! - `role` — role id to UI role label mapping and gating helpers
//! - `session` — session state, expiry policy, renewal scheduling,
//!   single-flight silent refresh, visibility handling, and the
//!   `SessionManager` that ties them together
//! - `navigation` — in-memory navigation history with one-time token handoff

pub mod jwt;
pub mod navigation;
pub mod role;
pub mod session;

pub use jwt::{AuthState, Claims, ClaimsDecoder, DecodeError};
pub use navigation::{HandoffPayload, MemoryNavigator};
pub use role::RoleLabel;
pub use session::{
    ExpiryPolicy, RefreshOutcome, SessionManager, SessionPhase, SessionSnapshot, Visibility,
    VisibilityHandle,
};
