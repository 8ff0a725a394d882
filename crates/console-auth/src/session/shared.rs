//! Shared state behind a [`super::SessionManager`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use console_core::traits::{AuthApi, Clock, Navigator};

use crate::jwt::ClaimsDecoder;

use super::policy::ExpiryPolicy;
use super::refresh::InFlight;
use super::scheduler::RefreshScheduler;
use super::state::SessionStore;

/// Everything the session components share. Each field is owned by one
/// component and only that component's methods mutate it.
#[derive(Debug)]
pub(crate) struct SessionCore {
    /// Backend auth endpoints.
    pub(crate) api: Arc<dyn AuthApi>,
    /// Login redirects and handoff payloads.
    pub(crate) navigator: Arc<dyn Navigator>,
    /// Source of "now" for expiry checks.
    pub(crate) clock: Arc<dyn Clock>,
    /// Claims extraction.
    pub(crate) decoder: ClaimsDecoder,
    /// Renewal timing rules.
    pub(crate) policy: ExpiryPolicy,
    /// Published session record.
    pub(crate) store: SessionStore,
    /// The one pending renewal timer.
    pub(crate) scheduler: RefreshScheduler,
    /// The one outstanding renewal call.
    pub(crate) inflight: InFlight,
    /// Set between `dispose()` and the next `start()`.
    disposed: AtomicBool,
    /// Bumped whenever the session is torn down locally; renewal results
    /// from an older epoch are discarded.
    epoch: AtomicU64,
}

impl SessionCore {
    pub(crate) fn new(
        api: Arc<dyn AuthApi>,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
        policy: ExpiryPolicy,
    ) -> Self {
        Self {
            api,
            navigator,
            clock,
            decoder: ClaimsDecoder::new(),
            policy,
            store: SessionStore::new(),
            scheduler: RefreshScheduler::default(),
            inflight: InFlight::default(),
            disposed: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
        }
    }

    pub(crate) fn now(&self) -> i64 {
        self.clock.now_unix()
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    pub(crate) fn set_disposed(&self, disposed: bool) {
        self.disposed.store(disposed, Ordering::SeqCst);
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    pub(crate) fn bump_epoch(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Ends the session: clear state, cancel the timer, go to login.
    pub(crate) fn teardown(&self) {
        self.store.clear();
        self.scheduler.clear();
        self.navigator.redirect_to_login();
    }
}
