//! Pacing and cooperative cancellation for step loops.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Stop flag shared between a scene and its worker thread.
///
/// The worker paces itself with [`StopSignal::wait`], which returns early as
/// soon as a stop is requested. A tick that is already executing is never
/// interrupted.
#[derive(Debug, Default)]
pub struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop and wakes a pacing wait in progress.
    pub fn stop(&self) {
        *self.flag() = true;
        self.wake.notify_all();
    }

    /// Clears a previous stop request.
    pub fn reset(&self) {
        *self.flag() = false;
    }

    pub fn is_stopped(&self) -> bool {
        *self.flag()
    }

    /// Sleeps for `delay` unless a stop is requested first.
    ///
    /// Returns true if the scene was stopped.
    pub fn wait(&self, delay: Duration) -> bool {
        if delay.is_zero() {
            return self.is_stopped();
        }

        let (stopped, _) = self
            .wake
            .wait_timeout_while(self.flag(), delay, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *stopped
    }

    fn flag(&self) -> MutexGuard<'_, bool> {
        self.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
