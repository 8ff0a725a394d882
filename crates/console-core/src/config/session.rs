//! Session renewal configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing parameters for proactive token renewal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// A token whose remaining lifetime is at or below this many seconds is
    /// treated as expiring soon.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Floor for any renewal delay, in milliseconds.
    #[serde(default = "default_min_delay")]
    pub min_delay_ms: u64,
    /// Delay used when a token's expiry cannot be determined, in milliseconds.
    #[serde(default = "default_fallback_delay")]
    pub fallback_delay_ms: u64,
}

impl SessionConfig {
    /// Leeway as a `Duration`.
    pub fn leeway(&self) -> Duration {
        Duration::from_secs(self.leeway_seconds)
    }

    /// Minimum renewal delay as a `Duration`.
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    /// Fallback renewal delay as a `Duration`.
    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            leeway_seconds: default_leeway(),
            min_delay_ms: default_min_delay(),
            fallback_delay_ms: default_fallback_delay(),
        }
    }
}

fn default_leeway() -> u64 {
    120
}

fn default_min_delay() -> u64 {
    5000
}

fn default_fallback_delay() -> u64 {
    30_000
}
