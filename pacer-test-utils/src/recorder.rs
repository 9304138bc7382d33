// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use event_listener::Event;
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every invocation of a wrapped operation.
///
/// Tests clone a `Recorder` into the operation closure, call
/// [`record`](Recorder::record) when the operation runs, and assert on
/// [`count`](Recorder::count) / [`calls`](Recorder::calls).
/// [`wait_for`](Recorder::wait_for) parks until a spawned execution has
/// actually run, which keeps assertions deterministic without sleeping.
#[derive(Debug)]
pub struct Recorder<A> {
    inner: Arc<RecorderInner<A>>,
}

#[derive(Debug)]
struct RecorderInner<A> {
    calls: Mutex<Vec<A>>,
    event: Event,
}

impl<A> Clone for Recorder<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> Default for Recorder<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Recorder<A> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RecorderInner {
                calls: Mutex::new(Vec::new()),
                event: Event::new(),
            }),
        }
    }

    /// Log one invocation with its arguments.
    pub fn record(&self, args: A) {
        self.inner.calls.lock().push(args);
        self.inner.event.notify(usize::MAX);
    }

    /// Number of invocations recorded so far.
    pub fn count(&self) -> usize {
        self.inner.calls.lock().len()
    }

    /// Wait until at least `n` invocations have been recorded.
    pub async fn wait_for(&self, n: usize) {
        loop {
            if self.count() >= n {
                return;
            }
            let listener = self.inner.event.listen();
            if self.count() >= n {
                return;
            }
            listener.await;
        }
    }
}

impl<A: Clone> Recorder<A> {
    /// Snapshot of every recorded argument, in invocation order.
    pub fn calls(&self) -> Vec<A> {
        self.inner.calls.lock().clone()
    }
}
