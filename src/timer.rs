//! Cancellable delayed-callback facility.
//!
//! The classifier's debounce and long-press logic is built entirely on
//! delayed callbacks, so construction fails when no async runtime is
//! reachable rather than degrading silently. Cancellation via `abort` is
//! best-effort; callers that need reliable invalidation stamp their state
//! with a generation counter and discard stale firings themselves.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::ClassifierError;

/// Schedules futures to run after a delay on the ambient tokio runtime.
#[derive(Clone)]
pub struct TimerFacility {
    handle: Handle,
}

impl TimerFacility {
    /// Bind to the current tokio runtime.
    ///
    /// # Errors
    /// `ClassifierError::TimerUnavailable` when called outside a runtime;
    /// without delayed callbacks the press classifier cannot function.
    pub fn from_current_runtime() -> Result<Self, ClassifierError> {
        Handle::try_current()
            .map(|handle| Self { handle })
            .map_err(|err| ClassifierError::TimerUnavailable {
                reason: err.to_string(),
            })
    }

    /// Run `task` after `delay`.
    ///
    /// The returned handle aborts the pending timer when dropped via
    /// `abort()`; an already-running task is not interrupted mid-callback.
    pub fn schedule<F>(&self, delay: Duration, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn construction_fails_outside_runtime() {
        let result = TimerFacility::from_current_runtime();
        assert!(matches!(
            result,
            Err(ClassifierError::TimerUnavailable { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_task_fires_after_delay() {
        let timers = TimerFacility::from_current_runtime().unwrap();
        let fired = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&fired);
        timers.schedule(Duration::from_millis(100), async move {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!fired.load(Ordering::SeqCst), "fired before the delay");

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(fired.load(Ordering::SeqCst), "never fired");
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_task_never_fires() {
        let timers = TimerFacility::from_current_runtime().unwrap();
        let fired = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&fired);
        let handle = timers.schedule(Duration::from_millis(100), async move {
            flag.store(true, Ordering::SeqCst);
        });
        handle.abort();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!fired.load(Ordering::SeqCst), "aborted timer still fired");
    }
}
