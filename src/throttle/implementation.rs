// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::engine::{Config, Decision, Operation, Shared, SlotValue};
use crate::options::ThrottleOptions;
use futures::FutureExt;
use pacer_core::{Clock, CoarseClock, MonotonicClock, Slot};
use pacer_error::{RateError, Result};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Wrap `op` in a high-precision throttle.
///
/// At most one execution per `wait` window, measured on the monotonic clock.
/// See [`Throttle`] for the handle's surface and the module docs for the
/// policy.
///
/// # Errors
///
/// Returns [`RateError::InvalidConfig`] for a zero `wait` or a `max_wait`
/// shorter than `wait`.
pub fn throttle<A, T, F, Fut>(
    op: F,
    wait: Duration,
    options: ThrottleOptions,
) -> Result<Throttle<A, T>>
where
    A: Clone + Send + 'static,
    T: Clone + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    Throttle::with_clock(op, wait, options, MonotonicClock)
}

/// Wrap `op` in a medium-precision throttle.
///
/// Identical state machine to [`throttle`], read off the coarse wall clock:
/// scheduling decisions may drift by one clock tick, shared-result semantics
/// are unchanged. Choose this when monotonic-clock reads are too costly for
/// the call site.
///
/// # Errors
///
/// Returns [`RateError::InvalidConfig`] for a zero `wait` or a `max_wait`
/// shorter than `wait`.
pub fn throttle_coarse<A, T, F, Fut>(
    op: F,
    wait: Duration,
    options: ThrottleOptions,
) -> Result<Throttle<A, T, CoarseClock>>
where
    A: Clone + Send + 'static,
    T: Clone + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    Throttle::with_clock(op, wait, options, CoarseClock)
}

/// A rate-limited callable with throttle semantics.
///
/// Cloning the handle is cheap; all clones drive the same window.
pub struct Throttle<A, T, C: Clock = MonotonicClock> {
    shared: Arc<Shared<A, T, C>>,
}

impl<A, T, C> Throttle<A, T, C>
where
    A: Clone + Send + 'static,
    T: Clone + Send + 'static,
    C: Clock,
{
    /// Construct a throttle on an explicit clock source.
    ///
    /// Must be called within a tokio runtime when `options.signal` is set
    /// (the abort watcher is spawned here).
    ///
    /// # Errors
    ///
    /// Returns [`RateError::InvalidConfig`] for a zero `wait` or a `max_wait`
    /// shorter than `wait`.
    pub fn with_clock<F, Fut>(
        op: F,
        wait: Duration,
        options: ThrottleOptions,
        clock: C,
    ) -> Result<Self>
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let op: Operation<A, T> = Arc::new(move |args| op(args).boxed());
        let shared = Shared::build(
            op,
            wait,
            Config {
                leading: options.leading,
                trailing: options.trailing,
                max_wait: options.max_wait,
                signal: options.signal,
                // A cancelled throttle keeps its arguments so flush() can
                // still execute them.
                clear_args_on_cancel: false,
            },
            clock,
        )?;
        Ok(Self { shared })
    }

    /// Invoke the wrapper.
    ///
    /// Resolves with the value produced by the execution this call mapped to
    /// (leading, trailing, or joined), or with the previous result when
    /// policy suppresses execution entirely. Fails with a cancellation-kind
    /// error, an abort-kind error, or the wrapped operation's own failure.
    pub async fn call(&self, args: A) -> Result<Option<T>> {
        match self.decide(args) {
            Decision::Execute { args, adopted } => self.execute_leading(args, adopted).await,
            Decision::Join(settled) => settled.await,
            Decision::Skip(value) => value,
        }
    }

    /// The throttle state machine, run synchronously under the state lock.
    fn decide(&self, args: A) -> Decision<A, T> {
        let shared = &self.shared;
        if shared.is_aborted() {
            return Decision::Skip(Err(RateError::Aborted));
        }
        let now = shared.clock.now();
        let mut state = shared.state.lock();
        let elapsed = now - state.last_exec.unwrap_or(shared.origin);
        let window_open = state.last_exec.is_none() || elapsed >= shared.wait;

        if shared.leading && window_open {
            state.last_exec = Some(now);
            state.burst_leading_fired = true;
            state.timer = None;
            // Callers already joined on the slot ride along with this
            // execution instead of waiting for a timer that no longer exists.
            let adopted = state.slot.take();
            state.last_args = if shared.trailing {
                Some(args.clone())
            } else {
                None
            };
            return Decision::Execute { args, adopted };
        }

        if shared.trailing {
            state.last_args = Some(args);
            let slot = state.slot.get_or_insert_with(Slot::new).clone();
            let delay = shared.trailing_delay(elapsed);
            state.timer = Some(Shared::arm(shared, delay));
            return Decision::Join(slot.wait());
        }

        // Neither edge fires for this call.
        Decision::Skip(Ok(state.last_result.clone()))
    }

    async fn execute_leading(
        &self,
        args: A,
        adopted: Option<Slot<SlotValue<T>>>,
    ) -> Result<Option<T>> {
        let outcome = (self.shared.op)(args).await;
        self.shared.record_and_settle(outcome, adopted)
    }

    /// Cancel the armed timer and reject outstanding callers with
    /// [`RateError::Cancelled`].
    ///
    /// Non-sticky: the wrapper accepts new invocations afterwards. The most
    /// recent arguments are retained, so [`flush`](Throttle::flush) can still
    /// execute them.
    pub fn cancel(&self) {
        self.shared.cancel();
    }

    /// Execute any retained arguments immediately.
    ///
    /// If arguments are retained and no abort is in effect, invokes the
    /// wrapped operation now, settles any pending callers with the outcome,
    /// and returns it. Otherwise returns the previous result and settles
    /// pending callers with that.
    pub async fn flush(&self) -> Result<Option<T>> {
        self.shared.flush().await
    }

    /// Whether callers are currently awaiting a scheduled execution.
    pub fn is_pending(&self) -> bool {
        self.shared.is_pending()
    }

    /// The most recent successful result, if any execution has completed.
    pub fn last_result(&self) -> Option<T> {
        self.shared.last_result()
    }
}

impl<A, T, C: Clock> Clone for Throttle<A, T, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A, T, C: Clock> fmt::Debug for Throttle<A, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("Throttle")
            .field("wait", &self.shared.wait)
            .field("leading", &self.shared.leading)
            .field("trailing", &self.shared.trailing)
            .field("max_wait", &self.shared.max_wait)
            .field("pending", &state.slot.is_some())
            .field("burst_leading_fired", &state.burst_leading_fired)
            .finish_non_exhaustive()
    }
}
