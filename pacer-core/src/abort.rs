// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Abort signals and controllers.
//!
//! An [`AbortSignal`] is a cloneable observation handle over shared abort
//! state; an [`AbortController`] owns the state and is the only way to raise
//! it. The split mirrors how the engines consume signals: a wrapper holds a
//! signal as a weak back-reference and observes it, while whoever built the
//! controller decides when to abort.

use crate::task::TimerTask;
use event_listener::{Event, EventListener};
use futures::future::{select, select_all, Either};
use futures::pin_mut;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

/// Cloneable handle observing shared abort state.
///
/// All clones observe the same state: once any associated
/// [`AbortController`] aborts, every clone reports `is_aborted() == true`
/// and every [`aborted()`](AbortSignal::aborted) future resolves.
#[derive(Clone, Debug)]
pub struct AbortSignal {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    aborted: AtomicBool,
    event: Event,
}

impl AbortSignal {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                aborted: AtomicBool::new(false),
                event: Event::new(),
            }),
        }
    }

    /// Check whether the signal has been aborted (non-blocking).
    pub fn is_aborted(&self) -> bool {
        // Acquire pairs with the Release store in raise()
        self.inner.aborted.load(Ordering::Acquire)
    }

    /// Flip the state and wake every listener. Idempotent.
    pub(crate) fn raise(&self) {
        self.inner.aborted.store(true, Ordering::Release);
        self.inner.event.notify(usize::MAX);
    }

    /// Wait asynchronously until the signal is aborted.
    ///
    /// Resolves immediately if the signal is already aborted. The returned
    /// future owns a clone of the signal, so it can outlive `self` and be
    /// raced inside spawned tasks.
    pub fn aborted(&self) -> Aborted {
        Aborted {
            signal: self.clone(),
            listener: None,
        }
    }
}

/// Future returned by [`AbortSignal::aborted()`].
pub struct Aborted {
    signal: AbortSignal,
    listener: Option<EventListener>,
}

impl Future for Aborted {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        loop {
            if this.signal.is_aborted() {
                return Poll::Ready(());
            }
            match &mut this.listener {
                // Register, then loop to re-check: raise() may have slipped in
                // between the check above and listen().
                None => this.listener = Some(this.signal.inner.event.listen()),
                Some(listener) => match Pin::new(listener).poll(cx) {
                    Poll::Ready(()) => this.listener = None,
                    Poll::Pending => return Poll::Pending,
                },
            }
        }
    }
}

/// Owner of abort state.
///
/// Three constructors cover the cancellation surface:
///
/// - [`AbortController::new`] - plain controller, aborted only by
///   [`abort()`](AbortController::abort)
/// - [`AbortController::with_timeout`] - aborts itself after a duration
/// - [`AbortController::any_of`] - aborts when any of N source signals
///   aborts
///
/// # Example
///
/// ```
/// use pacer_core::AbortController;
///
/// let controller = AbortController::new();
/// let signal = controller.signal();
/// assert!(!signal.is_aborted());
///
/// controller.abort();
/// assert!(signal.is_aborted());
/// ```
#[derive(Debug)]
pub struct AbortController {
    signal: AbortSignal,
    // Timeout or combinator watcher; cancelled when the controller drops.
    _watcher: Option<TimerTask>,
}

impl AbortController {
    /// Create a controller in the non-aborted state.
    pub fn new() -> Self {
        Self {
            signal: AbortSignal::new(),
            _watcher: None,
        }
    }

    /// Create a controller that aborts itself after `timeout`.
    ///
    /// Must be called within a tokio runtime. Dropping the controller before
    /// the timeout releases the internal timer without aborting.
    pub fn with_timeout(timeout: Duration) -> Self {
        let signal = AbortSignal::new();
        let raised = signal.clone();
        let watcher = TimerTask::spawn(move |stop| async move {
            let sleep = tokio::time::sleep(timeout);
            let stopped = stop.aborted();
            pin_mut!(sleep, stopped);
            if let Either::Left(_) = select(sleep, stopped).await {
                raised.raise();
            }
        });
        Self {
            signal,
            _watcher: Some(watcher),
        }
    }

    /// Create a controller whose signal aborts when any input signal aborts.
    ///
    /// An input that is already aborted short-circuits: the derived signal is
    /// born aborted and no watcher is spawned. Otherwise a single watcher
    /// task races a one-shot listener per input; the first to fire wins, and
    /// dropping the derived controller releases the watcher and every
    /// listener. With no inputs the derived signal never aborts externally.
    ///
    /// Must be called within a tokio runtime unless it short-circuits.
    pub fn any_of<I>(signals: I) -> Self
    where
        I: IntoIterator<Item = AbortSignal>,
    {
        let signal = AbortSignal::new();
        let sources: Vec<AbortSignal> = signals.into_iter().collect();

        if sources.iter().any(AbortSignal::is_aborted) {
            signal.raise();
            return Self {
                signal,
                _watcher: None,
            };
        }
        if sources.is_empty() {
            return Self {
                signal,
                _watcher: None,
            };
        }

        let raised = signal.clone();
        let watcher = TimerTask::spawn(move |stop| async move {
            let listeners = sources
                .iter()
                .map(|source| Box::pin(source.aborted()))
                .collect::<Vec<_>>();
            let any = select_all(listeners);
            let stopped = stop.aborted();
            pin_mut!(any, stopped);
            if let Either::Left(_) = select(any, stopped).await {
                raised.raise();
            }
        });
        Self {
            signal,
            _watcher: Some(watcher),
        }
    }

    /// A fresh observation handle on this controller's state.
    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Abort. Idempotent: repeated calls observe the settled state and wake
    /// no one twice.
    pub fn abort(&self) {
        self.signal.raise();
    }

    /// Check whether this controller has aborted (non-blocking).
    pub fn is_aborted(&self) -> bool {
        self.signal.is_aborted()
    }
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}
