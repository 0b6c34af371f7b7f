// src/crawl/tracker.rs
// =============================================================================
// Counts how many crawl tasks are still running and lets the caller wait
// until that number reaches zero.
//
// Every task is represented by a `TaskGuard`:
// - `register()` bumps the count and hands back the guard
// - dropping the guard lowers the count again
//
// Because the release lives in Drop, it happens exactly once on every exit
// path: normal return, early return, a panic inside the task, or the runtime
// dropping the task during shutdown.
//
// The count itself lives in a tokio `watch` channel. Waiters subscribe and
// sleep until they observe zero, with no polling.
// =============================================================================

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug)]
pub struct CompletionTracker {
    outstanding: watch::Sender<usize>,
}

/// One unit of outstanding work. Dropping it releases the unit.
#[derive(Debug)]
#[must_use = "dropping the guard immediately releases the task"]
pub struct TaskGuard {
    tracker: Arc<CompletionTracker>,
}

impl CompletionTracker {
    pub fn new() -> Arc<Self> {
        let (outstanding, _) = watch::channel(0);
        Arc::new(Self { outstanding })
    }

    /// Registers one task.
    ///
    /// Call this before spawning the task the guard belongs to, and move the
    /// guard into it. Registering after the spawn would let `wait_idle`
    /// observe a transient zero and return early.
    pub fn register(self: &Arc<Self>) -> TaskGuard {
        self.outstanding.send_modify(|n| *n += 1);
        TaskGuard {
            tracker: Arc::clone(self),
        }
    }

    fn release(&self) {
        self.outstanding.send_modify(|n| {
            debug_assert!(*n > 0, "released more tasks than were registered");
            *n = n.saturating_sub(1);
        });
    }

    /// Number of tasks registered and not yet finished.
    pub fn outstanding(&self) -> usize {
        *self.outstanding.borrow()
    }

    /// Resolves once no registered task is outstanding.
    pub async fn wait_idle(&self) {
        let mut rx = self.outstanding.subscribe();
        // The sender lives in `self`, so the channel cannot close under us
        let _ = rx.wait_for(|&n| n == 0).await;
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.tracker.release();
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a `watch` channel?
//    - A channel that holds a single current value
//    - Receivers can look at it or wait until it changes
//    - `wait_for` checks the value first, then sleeps until the predicate holds
//
// 2. What is Drop?
//    - Code that runs automatically when a value goes out of scope
//    - Also runs while a panic unwinds, and when tokio drops an unfinished task
//
// 3. Why `self: &Arc<Self>` on `register`?
//    - The guard needs its own Arc to the tracker so it can outlive the caller
// -----------------------------------------------------------------------------
