//! # console-client
//!
//! HTTP implementation of [`console_core::traits::AuthApi`] for the
//! network-core backend. The client keeps a cookie store, so the session
//! cookie set by login is what authorises later refresh and logout calls.

pub mod envelope;
pub mod http;

pub use envelope::ApiEnvelope;
pub use http::HttpAuthApi;
