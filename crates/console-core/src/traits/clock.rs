//! Wall-clock abstraction for expiry arithmetic.

/// Source of the current Unix time in seconds.
pub trait Clock: Send + Sync + std::fmt::Debug + 'static {
    /// Current time as Unix seconds.
    fn now_unix(&self) -> i64;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}
