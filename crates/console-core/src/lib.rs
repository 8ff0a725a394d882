//! # console-core
//!
//! Core crate for the network-core console. Contains the configuration
//! schemas, the collaborator traits the session manager is written
//! against (REST auth API, navigation, clock), and the unified error system.
//!
//! This crate has **no** internal dependencies on other console crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
