// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Batch throttle: aggregate high-frequency calls into bounded batches.
//!
//! A [`BatchThrottle`] buffers every call and hands the whole ordered buffer
//! to the batch operation once either bound trips: `batch_size` items
//! accumulated, or the oldest buffered item is `max_wait` old. Between those
//! bounds a timer re-checks the buffer every `wait`.
//!
//! Batching is eager and lossy on error: a failing batch operation is logged
//! and its items are not retried.
//!
//! # Example
//!
//! ```
//! use pacer::{throttle_batch, BatchOptions};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> pacer_error::Result<()> {
//! let sink = throttle_batch(
//!     |events: Vec<u32>| async move {
//!         // ship `events` somewhere
//!         let _ = events.len();
//!         Ok(())
//!     },
//!     Duration::from_millis(100),
//!     BatchOptions::new().batch_size(5),
//! )?;
//!
//! for event in 0..5 {
//!     sink.call(event); // fifth call flushes immediately
//! }
//! # Ok(())
//! # }
//! ```

use crate::options::{self, BatchOptions, DEFAULT_BATCH_MAX_WAIT_FACTOR};
use futures::future::{select, BoxFuture, Either};
use futures::{pin_mut, FutureExt};
use pacer_core::{AbortSignal, Clock, MonotonicClock, TimerTask};
use pacer_error::Result;
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::mem;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

type BatchOperation<A> = Arc<dyn Fn(Vec<A>) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Wrap `op` in a batch throttle.
///
/// `options.max_wait` defaults to [`DEFAULT_BATCH_MAX_WAIT_FACTOR`] times
/// `wait` when unset.
///
/// # Errors
///
/// Returns [`pacer_error::RateError::InvalidConfig`] for a zero `wait`, a
/// `batch_size` of zero, or an explicit `max_wait` shorter than `wait`.
pub fn throttle_batch<A, F, Fut>(
    op: F,
    wait: Duration,
    options: BatchOptions,
) -> Result<BatchThrottle<A>>
where
    A: Send + 'static,
    F: Fn(Vec<A>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    options::validate_wait(wait)?;
    options::validate_batch_size(options.batch_size)?;
    options::validate_max_wait(wait, options.max_wait)?;
    let max_wait = options
        .max_wait
        .unwrap_or(wait * DEFAULT_BATCH_MAX_WAIT_FACTOR);

    let clock = MonotonicClock;
    Ok(BatchThrottle {
        shared: Arc::new(BatchShared {
            op: Arc::new(move |batch| op(batch).boxed()),
            wait,
            batch_size: options.batch_size,
            max_wait,
            clock,
            state: Mutex::new(BatchState {
                buffer: Vec::new(),
                timer: None,
                first_enqueue: None,
            }),
        }),
    })
}

/// Handle to a batch throttle. Cloning is cheap; all clones feed one buffer.
pub struct BatchThrottle<A> {
    shared: Arc<BatchShared<A>>,
}

impl<A> BatchThrottle<A>
where
    A: Send + 'static,
{
    /// Append `args` to the current batch.
    ///
    /// Flushes immediately when the size or age bound trips; otherwise
    /// (re)arms the re-check timer.
    pub fn call(&self, args: A) {
        let shared = &self.shared;
        let now = shared.clock.now();
        let mut state = shared.state.lock();
        if state.buffer.is_empty() {
            state.first_enqueue = Some(now);
        }
        state.buffer.push(args);

        let age = state
            .first_enqueue
            .map_or(Duration::ZERO, |first| now - first);
        if state.buffer.len() >= shared.batch_size || age >= shared.max_wait {
            state.timer = None;
            let batch = mem::take(&mut state.buffer);
            state.first_enqueue = None;
            drop(state);
            shared.dispatch(batch);
        } else {
            let delay = shared.wait.min(shared.max_wait.saturating_sub(age));
            state.timer = Some(BatchShared::arm(shared, delay));
        }
    }

    /// Hand whatever is buffered to the batch operation right now.
    pub fn flush(&self) {
        let shared = &self.shared;
        let batch = {
            let mut state = shared.state.lock();
            state.timer = None;
            state.first_enqueue = None;
            mem::take(&mut state.buffer)
        };
        if !batch.is_empty() {
            shared.dispatch(batch);
        }
    }

    /// Number of calls buffered for the next batch.
    pub fn buffered(&self) -> usize {
        self.shared.state.lock().buffer.len()
    }
}

impl<A> Clone for BatchThrottle<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A> fmt::Debug for BatchThrottle<A>
where
    A: Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchThrottle")
            .field("wait", &self.shared.wait)
            .field("batch_size", &self.shared.batch_size)
            .field("max_wait", &self.shared.max_wait)
            .field("buffered", &self.buffered())
            .finish_non_exhaustive()
    }
}

struct BatchShared<A> {
    op: BatchOperation<A>,
    wait: Duration,
    batch_size: usize,
    max_wait: Duration,
    clock: MonotonicClock,
    state: Mutex<BatchState<A>>,
}

struct BatchState<A> {
    buffer: Vec<A>,
    timer: Option<TimerTask>,
    first_enqueue: Option<Instant>,
}

impl<A> BatchShared<A>
where
    A: Send + 'static,
{
    /// Spawn the batch operation fire-and-forget; a failure is logged and the
    /// batch is not retried.
    fn dispatch(&self, batch: Vec<A>) {
        let fut = (self.op)(batch);
        tokio::spawn(async move {
            if let Err(error) = fut.await {
                crate::warn!("batch operation failed, dropping batch: {error}");
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
                Self::tick(&shared, &stop);
            }
        })
    }

    /// Re-check timer: flush if a bound has tripped, re-arm otherwise.
    fn tick(shared: &Arc<Self>, stop: &AbortSignal) {
        let batch = {
            let mut state = shared.state.lock();
            if stop.is_aborted() {
                return;
            }
            state.timer = None;
            if state.buffer.is_empty() {
                state.first_enqueue = None;
                return;
            }
            let now = shared.clock.now();
            let age = state
                .first_enqueue
                .map_or(Duration::ZERO, |first| now - first);
            if state.buffer.len() >= shared.batch_size || age >= shared.max_wait {
                state.first_enqueue = None;
                mem::take(&mut state.buffer)
            } else {
                let delay = shared.wait.min(shared.max_wait.saturating_sub(age));
                state.timer = Some(Self::arm(shared, delay));
                return;
            }
        };
        shared.dispatch(batch);
    }
}
