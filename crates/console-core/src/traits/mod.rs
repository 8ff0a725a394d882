//! Core traits defined in `console-core` and implemented by other crates.

pub mod auth_api;
pub mod clock;
pub mod navigator;

pub use auth_api::{AuthApi, TokenResponse};
pub use clock::{Clock, SystemClock};
pub use navigator::Navigator;
