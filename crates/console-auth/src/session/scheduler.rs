//! Arms the renewal timer.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::jwt::Claims;

use super::shared::SessionCore;
use super::timer::ScheduledTask;

/// Owns the single renewal timer of a session.
#[derive(Debug, Default)]
pub(crate) struct RefreshScheduler {
    task: ScheduledTask,
}

impl RefreshScheduler {
    /// Arms a renewal `delay` from now, replacing any pending one.
    ///
    /// The timer holds only a weak link to the session, so a dropped
    /// session never renews.
    pub(crate) fn arm(&self, core: &Arc<SessionCore>, delay: Duration) {
        let session = Arc::downgrade(core);
        debug!(delay_ms = delay.as_millis() as u64, "Scheduling token renewal");

        self.task.schedule(delay, async move {
            let Some(core) = session.upgrade() else {
                return;
            };
            debug!("Renewal timer fired");
            core.silent_refresh().await;
        });
    }

    /// Cancels the pending renewal. Idempotent.
    pub(crate) fn clear(&self) -> bool {
        let cleared = self.task.cancel();
        if cleared {
            debug!("Cleared pending renewal timer");
        }
        cleared
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.task.is_pending()
    }

    pub(crate) fn pending_delay(&self) -> Option<Duration> {
        self.task.pending_delay()
    }
}

impl SessionCore {
    /// Schedules renewal for `token`, decoding it to find its expiry.
    ///
    /// Tokens that cannot be decoded, or carry no `exp`, are renewed after
    /// the policy's fallback delay.
    pub(crate) fn schedule_refresh(self: &Arc<Self>, token: &str) {
        let claims = match self.decoder.decode(token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!(error = %e, "Scheduling renewal without usable claims");
                None
            }
        };
        let delay = self.policy.delay_for(claims.as_ref(), self.now());
        self.scheduler.arm(self, delay);
    }

    /// Picks the next renewal after a token has been installed: the floor
    /// when the token is already close to expiry, the computed delay
    /// otherwise.
    pub(crate) fn schedule_after_install(self: &Arc<Self>, claims: &Claims) {
        let now = self.now();
        if self.policy.is_expiring_soon(claims, now) {
            debug!(
                remaining_seconds = ?claims.remaining_seconds(now),
                "Token already expiring, retrying at minimum delay"
            );
            self.scheduler.arm(self, self.policy.min_delay);
        } else {
            self.scheduler.arm(self, self.policy.refresh_delay(claims, now));
        }
    }
}
