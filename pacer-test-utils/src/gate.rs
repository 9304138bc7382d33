// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use event_listener::Event;
use parking_lot::Mutex;
use std::sync::Arc;

/// A manually released barrier for holding a wrapped operation in flight.
///
/// The operation awaits [`passed`](Gate::passed); the test decides when it
/// completes by calling [`open`](Gate::open).
#[derive(Clone, Debug, Default)]
pub struct Gate {
    inner: Arc<GateInner>,
}

#[derive(Debug, Default)]
struct GateInner {
    open: Mutex<bool>,
    event: Event,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release every task waiting at the gate, and all future ones.
    pub fn open(&self) {
        *self.inner.open.lock() = true;
        self.inner.event.notify(usize::MAX);
    }

    /// Wait until the gate is opened.
    pub async fn passed(&self) {
        loop {
            if *self.inner.open.lock() {
                return;
            }
            let listener = self.inner.event.listen();
            if *self.inner.open.lock() {
                return;
            }
            listener.await;
        }
    }
}
