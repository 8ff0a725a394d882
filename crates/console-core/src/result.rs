//! Convenience result type alias for the console.

use crate::error::AppError;

/// A specialized `Result` type for console operations.
pub type AppResult<T> = Result<T, AppError>;
