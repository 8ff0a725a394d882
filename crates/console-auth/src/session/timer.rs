//! A single-slot delayed task.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

/// The task currently armed in the slot.
#[derive(Debug)]
struct Armed {
    /// Identifies this arming; a fired task only clears its own entry.
    generation: u64,
    /// Delay requested when armed.
    delay: Duration,
    /// The sleeping tokio task.
    handle: JoinHandle<()>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    armed: Option<Armed>,
}

/// Holds at most one pending delayed task.
///
/// Arming a new task aborts the previous one first. Once a task's delay
/// elapses it removes itself from the slot before running its body, so the
/// body is free to arm the next task.
#[derive(Debug, Default)]
pub struct ScheduledTask {
    slot: Arc<Mutex<Slot>>,
}

impl ScheduledTask {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` after `delay`, replacing whatever was pending.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut slot = lock(&self.slot);
        if let Some(previous) = slot.armed.take() {
            previous.handle.abort();
            trace!(generation = previous.generation, "Replaced pending task");
        }

        slot.generation += 1;
        let generation = slot.generation;
        let shared = Arc::clone(&self.slot);

        // The slot lock is held until `armed` is stored, so the spawned
        // task cannot observe the slot before its own entry is in place.
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut slot = lock(&shared);
                match &slot.armed {
                    Some(armed) if armed.generation == generation => slot.armed = None,
                    _ => return,
                }
            }
            task.await;
        });

        slot.armed = Some(Armed {
            generation,
            delay,
            handle,
        });
    }

    /// Cancels the pending task, if any. Safe to call repeatedly.
    pub fn cancel(&self) -> bool {
        let mut slot = lock(&self.slot);
        match slot.armed.take() {
            Some(armed) => {
                armed.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Whether a task is waiting to fire.
    pub fn is_pending(&self) -> bool {
        lock(&self.slot).armed.is_some()
    }

    /// Delay the pending task was armed with.
    pub fn pending_delay(&self) -> Option<Duration> {
        lock(&self.slot).armed.as_ref().map(|a| a.delay)
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}
