//! Cancellable delayed task

use std::time::Duration;
use tokio::task::JoinHandle;

/// Runs a closure once after a delay unless cancelled first
///
/// Dropping the task cancels it. Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Schedule `f` to run after `delay`
    pub fn after<F>(delay: Duration, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        });
        Self { handle }
    }

    /// Cancel the task; no-op if it already ran
    pub fn cancel(self) {
        drop(self);
    }

    /// Whether the closure has run (or the task was aborted)
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
