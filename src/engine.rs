// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Plumbing shared by the throttle and debounce engines.
//!
//! Both promise-carrying policies drive the same record: a type-erased
//! operation, the edge configuration, and a mutex-guarded [`State`] holding
//! the armed timer, the pending [`Slot`], and the invocation bookkeeping.
//! Policy-specific behavior lives in each policy's `decide` step; everything
//! downstream of a decision (arming timers, firing them, flushing,
//! cancelling, observing aborts) is identical and lives here.
//!
//! Locking discipline: the state mutex is only ever held for synchronous
//! bookkeeping, never across an `.await`.

use crate::options;
use futures::future::{select, BoxFuture, Either};
use futures::pin_mut;
use pacer_core::{AbortSignal, Clock, Slot, TimerTask};
use pacer_error::{RateError, Result};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Type-erased wrapped operation.
pub(crate) type Operation<A, T> =
    Arc<dyn Fn(A) -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// What a settled slot carries: the execution outcome, or the retained
/// `last_result` when the slot resolved without a fresh execution.
pub(crate) type SlotValue<T> = Result<Option<T>>;

/// Outcome of a policy's synchronous decision step.
pub(crate) enum Decision<A, T: Clone> {
    /// Execute now, on the caller's future (leading edge). `adopted` is the
    /// outstanding slot, if any; the execution's outcome settles it so
    /// previously joined callers resolve with the same value.
    Execute {
        args: A,
        adopted: Option<Slot<SlotValue<T>>>,
    },
    /// Await the scheduled slot (trailing edge, possibly joined).
    Join(pacer_core::Settled<SlotValue<T>>),
    /// No execution for this call: hand back the prepared value.
    Skip(SlotValue<T>),
}

pub(crate) struct State<A, T, I> {
    /// The single armed scheduler task; replacing it cancels the old one.
    pub(crate) timer: Option<TimerTask>,
    /// Abort-signal watcher; dropped on cancel and on engine drop.
    pub(crate) watcher: Option<TimerTask>,
    pub(crate) last_exec: Option<I>,
    pub(crate) last_args: Option<A>,
    pub(crate) last_result: Option<T>,
    pub(crate) slot: Option<Slot<SlotValue<T>>>,
    /// Throttle bookkeeping: the leading edge already fired in this window.
    pub(crate) burst_leading_fired: bool,
}

impl<A, T, I> State<A, T, I> {
    fn new() -> Self {
        Self {
            timer: None,
            watcher: None,
            last_exec: None,
            last_args: None,
            last_result: None,
            slot: None,
            burst_leading_fired: false,
        }
    }
}

pub(crate) struct Shared<A, T, C: Clock> {
    pub(crate) op: Operation<A, T>,
    pub(crate) wait: Duration,
    pub(crate) leading: bool,
    pub(crate) trailing: bool,
    pub(crate) max_wait: Option<Duration>,
    pub(crate) signal: Option<AbortSignal>,
    pub(crate) clock: C,
    /// Reference point for `elapsed` while nothing has executed yet.
    pub(crate) origin: C::Instant,
    /// Policy knob: debounce forgets `last_args` on cancel, throttle keeps
    /// them so a later flush can still execute.
    clear_args_on_cancel: bool,
    pub(crate) state: Mutex<State<A, T, C::Instant>>,
}

pub(crate) struct Config {
    pub(crate) leading: bool,
    pub(crate) trailing: bool,
    pub(crate) max_wait: Option<Duration>,
    pub(crate) signal: Option<AbortSignal>,
    pub(crate) clear_args_on_cancel: bool,
}

impl<A, T, C> Shared<A, T, C>
where
    A: Send + 'static,
    T: Clone + Send + 'static,
    C: Clock,
{
    /// Validate, build the shared record, and install the abort watcher.
    pub(crate) fn build(
        op: Operation<A, T>,
        wait: Duration,
        config: Config,
        clock: C,
    ) -> Result<Arc<Self>> {
        options::validate_wait(wait)?;
        options::validate_max_wait(wait, config.max_wait)?;

        let origin = clock.now();
        let shared = Arc::new(Self {
            op,
            wait,
            leading: config.leading,
            trailing: config.trailing,
            max_wait: config.max_wait,
            signal: config.signal.clone(),
            clock,
            origin,
            clear_args_on_cancel: config.clear_args_on_cancel,
            state: Mutex::new(State::new()),
        });

        if let Some(signal) = config.signal {
            // Weak: the watcher must not keep an otherwise-dropped engine
            // alive for the lifetime of a long-lived signal.
            let weak = Arc::downgrade(&shared);
            let watcher = TimerTask::spawn(move |stop| watch_abort(signal, weak, stop));
            shared.state.lock().watcher = Some(watcher);
        }
        Ok(shared)
    }

    pub(crate) fn is_aborted(&self) -> bool {
        self.signal.as_ref().is_some_and(AbortSignal::is_aborted)
    }

    /// Delay for a trailing-edge timer, bounded by `max_wait`.
    pub(crate) fn trailing_delay(&self, elapsed: Duration) -> Duration {
        match self.max_wait {
            Some(max_wait) => self.wait.min(max_wait.saturating_sub(elapsed)),
            None => self.wait,
        }
    }

    /// Arm the trailing-edge timer. The caller stores the returned handle in
    /// `state.timer`, which drop-cancels whatever was armed before.
    pub(crate) fn arm(shared: &Arc<Self>, delay: Duration) -> TimerTask {
        let shared = Arc::clone(shared);
        TimerTask::spawn(move |stop| async move {
            let sleep = tokio::time::sleep(delay);
            let disarmed = stop.aborted();
            pin_mut!(sleep, disarmed);
            if let Either::Left(_) = select(sleep, disarmed).await {
                shared.fire(stop).await;
            }
        })
    }

    /// Trailing-edge timer callback.
    async fn fire(self: Arc<Self>, stop: AbortSignal) {
        let (work, slot, last) = {
            let mut state = self.state.lock();
            // The timer may have been disarmed between waking and taking the
            // lock; the disarming transition owns the state then.
            if stop.is_aborted() {
                return;
            }
            state.timer = None;
            if self.is_aborted() {
                let slot = state.slot.take();
                state.last_args = None;
                drop(state);
                if let Some(slot) = slot {
                    slot.settle(Err(RateError::Aborted));
                }
                return;
            }
            let slot = state.slot.take();
            let work = state.last_args.take();
            if work.is_some() {
                state.last_exec = Some(self.clock.now());
                state.burst_leading_fired = false;
            }
            (work, slot, state.last_result.clone())
        };
        match work {
            Some(args) => {
                let outcome = (self.op)(args).await;
                // The outcome reaches callers through the slot; there is no
                // direct caller on the timer path.
                let _ = self.record_and_settle(outcome, slot);
            }
            None => {
                if let Some(slot) = slot {
                    slot.settle(Ok(last));
                }
            }
        }
    }

    /// Run an execution outcome through `last_result` bookkeeping and settle
    /// the given slot with it. Returns the caller-facing value.
    pub(crate) fn record_and_settle(
        &self,
        outcome: Result<T>,
        slot: Option<Slot<SlotValue<T>>>,
    ) -> Result<Option<T>> {
        match outcome {
            Ok(value) => {
                self.state.lock().last_result = Some(value.clone());
                if let Some(slot) = slot {
                    slot.settle(Ok(Some(value.clone())));
                }
                Ok(Some(value))
            }
            Err(error) => {
                if let Some(slot) = slot {
                    slot.settle(Err(error.clone()));
                }
                Err(error)
            }
        }
    }

    /// Shared `cancel` transition.
    pub(crate) fn cancel(&self) {
        let slot = {
            let mut state = self.state.lock();
            state.timer = None;
            state.watcher = None;
            state.burst_leading_fired = false;
            if self.clear_args_on_cancel {
                state.last_args = None;
            }
            state.slot.take()
        };
        if let Some(slot) = slot {
            slot.settle(Err(RateError::Cancelled));
        }
    }

    /// Shared `flush` transition: execute retained arguments now, or settle
    /// with the previous result when there is nothing to execute.
    pub(crate) async fn flush(&self) -> Result<Option<T>> {
        let (work, slot, last) = {
            let mut state = self.state.lock();
            state.timer = None;
            let slot = state.slot.take();
            let work = if self.is_aborted() {
                None
            } else {
                state.last_args.take()
            };
            if work.is_some() {
                state.last_exec = Some(self.clock.now());
                state.burst_leading_fired = false;
            }
            (work, slot, state.last_result.clone())
        };
        match work {
            Some(args) => {
                let outcome = (self.op)(args).await;
                self.record_and_settle(outcome, slot)
            }
            None => {
                if let Some(slot) = slot {
                    slot.settle(Ok(last.clone()));
                }
                Ok(last)
            }
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.state.lock().slot.is_some()
    }

    pub(crate) fn last_result(&self) -> Option<T> {
        self.state.lock().last_result.clone()
    }

    /// Abort transition: reject every outstanding caller, drop the timer,
    /// clear transient state, and release the watcher itself.
    fn reject_all_aborted(&self) {
        let (slot, watcher) = {
            let mut state = self.state.lock();
            state.timer = None;
            state.last_args = None;
            state.burst_leading_fired = false;
            (state.slot.take(), state.watcher.take())
        };
        if let Some(slot) = slot {
            slot.settle(Err(RateError::Aborted));
        }
        drop(watcher);
    }
}

async fn watch_abort<A, T, C>(
    signal: AbortSignal,
    shared: Weak<Shared<A, T, C>>,
    stop: AbortSignal,
) where
    A: Send + 'static,
    T: Clone + Send + 'static,
    C: Clock,
{
    let aborted = signal.aborted();
    let stopped = stop.aborted();
    pin_mut!(aborted, stopped);
    if let Either::Left(_) = select(aborted, stopped).await {
        if let Some(shared) = shared.upgrade() {
            shared.reject_all_aborted();
        }
    }
}
