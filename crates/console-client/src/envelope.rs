//! Response envelope shared by every backend endpoint.

use serde::{Deserialize, Serialize};

/// `{ "result": ... }` on success, `{ "error": "..." }` on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Payload of a successful call.
    pub result: Option<T>,
    /// Display message of a failed call.
    pub error: Option<String>,
}
