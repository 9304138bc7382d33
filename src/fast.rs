// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Low-precision fire-and-forget wrappers.
//!
//! [`FastThrottle`] and [`FastDebounce`] run the same edge policies as their
//! promise-carrying siblings, on the coarse wall clock, but strip the result
//! machinery entirely: `call` returns `()` and a scheduled execution is
//! spawned fire-and-forget. A failing operation is logged and swallowed,
//! since there is no result channel to carry it.
//!
//! These types deliberately have no `cancel`/`flush`/`is_pending` surface;
//! picking the low tier forfeits the control operations at the type level.
//! Intended for hot paths (typing indicators, cursor broadcasts) where even
//! one future allocation per call is too costly.

use crate::options::{self, DebounceOptions, ThrottleOptions};
use futures::future::{select, BoxFuture, Either};
use futures::{pin_mut, FutureExt};
use pacer_core::{AbortSignal, Clock, CoarseClock, CoarseInstant, TimerTask};
use pacer_error::Result;
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

type FireAndForget<A> = Arc<dyn Fn(A) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Wrap `op` in a low-precision, fire-and-forget throttle.
///
/// # Errors
///
/// Returns [`pacer_error::RateError::InvalidConfig`] for a zero `wait` or a
/// `max_wait` shorter than `wait`.
pub fn throttle_fast<A, F, Fut>(
    op: F,
    wait: Duration,
    options: ThrottleOptions,
) -> Result<FastThrottle<A>>
where
    A: Clone + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let shared = FastShared::build(
        Arc::new(move |args| op(args).boxed()),
        wait,
        options.leading,
        options.trailing,
        options.max_wait,
        options.signal,
    )?;
    Ok(FastThrottle { shared })
}

/// Wrap `op` in a low-precision, fire-and-forget debounce.
///
/// # Errors
///
/// Returns [`pacer_error::RateError::InvalidConfig`] for a zero `wait` or a
/// `max_wait` shorter than `wait`.
pub fn debounce_fast<A, F, Fut>(
    op: F,
    wait: Duration,
    options: DebounceOptions,
) -> Result<FastDebounce<A>>
where
    A: Clone + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let shared = FastShared::build(
        Arc::new(move |args| op(args).boxed()),
        wait,
        options.leading,
        options.trailing,
        options.max_wait,
        options.signal,
    )?;
    Ok(FastDebounce { shared })
}

/// Fire-and-forget throttle handle. See the module docs.
pub struct FastThrottle<A> {
    shared: Arc<FastShared<A>>,
}

impl<A> FastThrottle<A>
where
    A: Clone + Send + 'static,
{
    /// Invoke the wrapper: execute now (leading), schedule (trailing), or
    /// drop the call. Never blocks and returns nothing.
    pub fn call(&self, args: A) {
        let shared = &self.shared;
        if shared.is_aborted() {
            return;
        }
        let now = shared.clock.now();
        let mut state = shared.state.lock();
        let elapsed = now - state.last_exec.unwrap_or(shared.origin);
        let window_open = state.last_exec.is_none() || elapsed >= shared.wait;

        if shared.leading && window_open {
            state.last_exec = Some(now);
            state.timer = None;
            state.last_args = if shared.trailing {
                Some(args.clone())
            } else {
                None
            };
            drop(state);
            shared.dispatch(args);
            return;
        }
        if shared.trailing {
            state.last_args = Some(args);
            let delay = shared.trailing_delay(elapsed);
            state.timer = Some(FastShared::arm(shared, delay));
        }
        // Neither edge: the call is dropped.
    }
}

impl<A> Clone for FastThrottle<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A> fmt::Debug for FastThrottle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastThrottle")
            .field("wait", &self.shared.wait)
            .field("leading", &self.shared.leading)
            .field("trailing", &self.shared.trailing)
            .finish_non_exhaustive()
    }
}

/// Fire-and-forget debounce handle. See the module docs.
pub struct FastDebounce<A> {
    shared: Arc<FastShared<A>>,
}

impl<A> FastDebounce<A>
where
    A: Clone + Send + 'static,
{
    /// Invoke the wrapper: restart the quiet period and execute now
    /// (leading) or schedule with the newest arguments (trailing). Never
    /// blocks and returns nothing.
    pub fn call(&self, args: A) {
        let shared = &self.shared;
        if shared.is_aborted() {
            return;
        }
        let now = shared.clock.now();
        let mut state = shared.state.lock();
        state.timer = None;
        let elapsed = now - state.last_exec.unwrap_or(shared.origin);
        let window_open = state.last_exec.is_none() || elapsed >= shared.wait;
        state.last_args = Some(args.clone());

        if shared.leading && window_open {
            state.last_exec = Some(now);
            drop(state);
            shared.dispatch(args);
            return;
        }
        if shared.trailing {
            let delay = shared.trailing_delay(elapsed);
            state.timer = Some(FastShared::arm(shared, delay));
        }
    }
}

impl<A> Clone for FastDebounce<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A> fmt::Debug for FastDebounce<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastDebounce")
            .field("wait", &self.shared.wait)
            .field("leading", &self.shared.leading)
            .field("trailing", &self.shared.trailing)
            .finish_non_exhaustive()
    }
}

struct FastShared<A> {
    op: FireAndForget<A>,
    wait: Duration,
    leading: bool,
    trailing: bool,
    max_wait: Option<Duration>,
    signal: Option<AbortSignal>,
    clock: CoarseClock,
    origin: CoarseInstant,
    state: Mutex<FastState<A>>,
}

struct FastState<A> {
    timer: Option<TimerTask>,
    last_exec: Option<CoarseInstant>,
    last_args: Option<A>,
}

impl<A> FastShared<A>
where
    A: Send + 'static,
{
    fn build(
        op: FireAndForget<A>,
        wait: Duration,
        leading: bool,
        trailing: bool,
        max_wait: Option<Duration>,
        signal: Option<AbortSignal>,
    ) -> Result<Arc<Self>> {
        options::validate_wait(wait)?;
        options::validate_max_wait(wait, max_wait)?;
        let clock = CoarseClock;
        let origin = clock.now();
        Ok(Arc::new(Self {
            op,
            wait,
            leading,
            trailing,
            max_wait,
            signal,
            clock,
            origin,
            state: Mutex::new(FastState {
                timer: None,
                last_exec: None,
                last_args: None,
            }),
        }))
    }

    fn is_aborted(&self) -> bool {
        self.signal.as_ref().is_some_and(AbortSignal::is_aborted)
    }

    fn trailing_delay(&self, elapsed: Duration) -> Duration {
        match self.max_wait {
            Some(max_wait) => self.wait.min(max_wait.saturating_sub(elapsed)),
            None => self.wait,
        }
    }

    /// Spawn the operation fire-and-forget; a failure is logged and dropped.
    fn dispatch(&self, args: A) {
        let fut = (self.op)(args);
        tokio::spawn(async move {
            if let Err(error) = fut.await {
                crate::warn!("rate-limited operation failed: {error}");
            }
        });
    }

    fn arm(shared: &Arc<Self>, delay: Duration) -> TimerTask {
        let shared = Arc::clone(shared);
        TimerTask::spawn(move |stop| async move {
            let sleep = tokio::time::sleep(delay);
            let disarmed = stop.aborted();
            pin_mut!(sleep, disarmed);
            if let Either::Left(_) = select(sleep, disarmed).await {
                shared.fire(&stop);
            }
        })
    }

    fn fire(&self, stop: &AbortSignal) {
        let work = {
            let mut state = self.state.lock();
            if stop.is_aborted() {
                return;
            }
            state.timer = None;
            if self.is_aborted() {
                state.last_args = None;
                return;
            }
            let work = state.last_args.take();
            if work.is_some() {
                state.last_exec = Some(self.clock.now());
            }
            work
        };
        if let Some(args) = work {
            self.dispatch(args);
        }
    }
}
