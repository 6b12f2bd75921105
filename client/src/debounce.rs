//! Debounce controller.
//!
//! Coalesces bursts of input into a single commit: each [`on_input`] call
//! cancels the pending timer and starts a new one, so `commit` runs once per
//! quiet period with the last value.
//!
//! [`on_input`]: DebounceController::on_input

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Callback invoked with the settled value.
pub type Commit<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Cancellable timer with a single pending slot.
pub struct DebounceController<T> {
    quiet: Duration,
    commit: Commit<T>,
    /// The scheduled commit, if any
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> DebounceController<T> {
    pub fn new(quiet: Duration, commit: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            quiet,
            commit: Arc::new(commit),
            pending: Mutex::new(None),
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Schedule `commit(value)` after the quiet interval, replacing any
    /// previously scheduled commit.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn on_input(&self, value: T) {
        let mut pending = self.slot();
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let commit = Arc::clone(&self.commit);
        let quiet = self.quiet;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            commit(value);
        }));
    }

    /// Drop the scheduled commit. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        match self.slot().take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    /// Whether a commit is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.slot()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Drop for DebounceController<T> {
    fn drop(&mut self) {
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}

impl<T> fmt::Debug for DebounceController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebounceController")
            .field("quiet", &self.quiet)
            .finish_non_exhaustive()
    }
}
