// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! One-shot broadcast cell.
//!
//! A [`Slot`] carries the result of one scheduled execution to every caller
//! that joined it: single producer, many consumers, settled at most once.
//! Each consumer clones the settled value, so joined callers observe an
//! equivalence class rather than racing for ownership.

use event_listener::{Event, EventListener};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

/// A single-producer, multi-consumer one-shot value.
///
/// Cloning a `Slot` clones the handle, not the value; all handles observe the
/// same settlement.
///
/// # Example
///
/// ```
/// use pacer_core::Slot;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let slot: Slot<u32> = Slot::new();
/// let reader = slot.clone();
///
/// assert!(slot.settle(7));
/// assert!(!slot.settle(8)); // first write wins
/// assert_eq!(reader.wait().await, 7);
/// # }
/// ```
#[derive(Debug)]
pub struct Slot<T> {
    inner: Arc<SlotInner<T>>,
}

#[derive(Debug)]
struct SlotInner<T> {
    settled: AtomicBool,
    value: Mutex<Option<T>>,
    event: Event,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Slot<T> {
    /// Create an unsettled slot.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SlotInner {
                settled: AtomicBool::new(false),
                value: Mutex::new(None),
                event: Event::new(),
            }),
        }
    }

    /// Settle the slot with `value`, waking every waiter.
    ///
    /// First write wins: returns `true` if this call settled the slot,
    /// `false` if it was already settled (the value is then dropped).
    pub fn settle(&self, value: T) -> bool {
        {
            let mut guard = self.inner.value.lock();
            if self.inner.settled.load(Ordering::Acquire) {
                return false;
            }
            *guard = Some(value);
            // Release pairs with the Acquire in peek(); the value write above
            // is ordered before the flag by the lock.
            self.inner.settled.store(true, Ordering::Release);
        }
        self.inner.event.notify(usize::MAX);
        true
    }

    /// Whether the slot has been settled.
    pub fn is_settled(&self) -> bool {
        self.inner.settled.load(Ordering::Acquire)
    }

    /// Read the settled value without waiting, if there is one.
    pub fn peek(&self) -> Option<T> {
        if self.is_settled() {
            self.inner.value.lock().clone()
        } else {
            None
        }
    }

    /// Wait for the slot to settle and receive a clone of the value.
    ///
    /// The returned future owns a handle, so it can be awaited after the
    /// originating `Slot` is dropped.
    pub fn wait(&self) -> Settled<T> {
        Settled {
            slot: self.clone(),
            listener: None,
        }
    }
}

impl<T: Clone> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Future returned by [`Slot::wait()`].
pub struct Settled<T> {
    slot: Slot<T>,
    listener: Option<EventListener>,
}

impl<T: Clone> Future for Settled<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let this = self.get_mut();
        loop {
            if let Some(value) = this.slot.peek() {
                return Poll::Ready(value);
            }
            match &mut this.listener {
                // Register, then loop to re-check: settle() may have slipped
                // in between peek() and listen().
                None => this.listener = Some(this.slot.inner.event.listen()),
                Some(listener) => match Pin::new(listener).poll(cx) {
                    Poll::Ready(()) => this.listener = None,
                    Poll::Pending => return Poll::Pending,
                },
            }
        }
    }
}
