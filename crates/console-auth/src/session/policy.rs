//! When to renew a token.

use std::time::Duration;

use console_core::config::SessionConfig;

use crate::jwt::Claims;

/// Pure timing rules for proactive renewal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    /// Window before `exp` in which a token counts as expiring.
    pub leeway: Duration,
    /// Floor applied to every renewal delay.
    pub min_delay: Duration,
    /// Delay used when expiry is unknown.
    pub fallback_delay: Duration,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

impl ExpiryPolicy {
    /// Builds the policy from session configuration.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            leeway: config.leeway(),
            min_delay: config.min_delay(),
            fallback_delay: config.fallback_delay(),
        }
    }

    /// True when `exp` is missing or at most `leeway` seconds away.
    pub fn is_expiring_soon(&self, claims: &Claims, now: i64) -> bool {
        match claims.exp {
            None => true,
            Some(exp) => exp.saturating_sub(now) <= self.leeway_secs(),
        }
    }

    /// `max(min_delay, (exp - leeway - now) seconds)`.
    ///
    /// A token without `exp` gets the floor; callers that cannot decode a
    /// token at all use [`ExpiryPolicy::delay_for`] instead.
    pub fn refresh_delay(&self, claims: &Claims, now: i64) -> Duration {
        let Some(exp) = claims.exp else {
            return self.min_delay;
        };

        let secs = exp.saturating_sub(self.leeway_secs()).saturating_sub(now);
        let millis = secs.saturating_mul(1000);
        if millis <= 0 {
            return self.min_delay;
        }
        Duration::from_millis(millis as u64).max(self.min_delay)
    }

    /// Delay for a token whose claims may be unavailable.
    ///
    /// Falls back to `fallback_delay` when decoding failed or `exp` is
    /// absent.
    pub fn delay_for(&self, claims: Option<&Claims>, now: i64) -> Duration {
        match claims {
            Some(claims) if claims.exp.is_some() => self.refresh_delay(claims, now),
            _ => self.fallback_delay,
        }
    }

    fn leeway_secs(&self) -> i64 {
        i64::try_from(self.leeway.as_secs()).unwrap_or(i64::MAX)
    }
}
