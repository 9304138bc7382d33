// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Spawned task handle with cooperative cancel-on-drop.

use crate::abort::AbortSignal;
use std::future::Future;

/// Handle to a spawned background task that cancels cooperatively on drop.
///
/// The body receives an [`AbortSignal`] it should race its waits against;
/// when the handle is dropped or [`cancel()`](TimerTask::cancel) is called,
/// the signal is raised and the task is expected to exit at its next
/// checkpoint. The engines use this for trailing-edge timers (re-arming a
/// timer replaces, and thereby releases, the previous one) and for
/// abort-signal watchers.
///
/// # Example
///
/// ```
/// use pacer_core::TimerTask;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let task = TimerTask::spawn(|stop| async move {
///     loop {
///         if stop.is_aborted() {
///             break;
///         }
///         tokio::task::yield_now().await;
///     }
/// });
///
/// drop(task); // signals the loop to exit
/// # }
/// ```
#[derive(Debug)]
pub struct TimerTask {
    stop: AbortSignal,
}

impl TimerTask {
    /// Spawn a background task with cancellation support.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(AbortSignal) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let stop = AbortSignal::new();
        tokio::spawn(f(stop.clone()));
        Self { stop }
    }

    /// Signal the task to stop without waiting for it to finish.
    pub fn cancel(&self) {
        self.stop.raise();
    }

    /// Whether cancellation has been requested, by `cancel()` or by drop.
    pub fn is_cancelled(&self) -> bool {
        self.stop.is_aborted()
    }
}

impl Drop for TimerTask {
    fn drop(&mut self) {
        self.stop.raise();
    }
}
