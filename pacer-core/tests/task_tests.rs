// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pacer_core::TimerTask;
use pacer_test_utils::drain_tasks;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn test_cancel_signals_the_body() {
    let observed = Arc::new(AtomicBool::new(false));
    let observed_clone = observed.clone();

    let task = TimerTask::spawn(|stop| async move {
        stop.aborted().await;
        observed_clone.store(true, Ordering::SeqCst);
    });
    drain_tasks().await;
    assert!(!task.is_cancelled());
    assert!(!observed.load(Ordering::SeqCst));

    task.cancel();
    drain_tasks().await;
    assert!(task.is_cancelled());
    assert!(observed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_drop_cancels_the_body() {
    let observed = Arc::new(AtomicBool::new(false));
    let observed_clone = observed.clone();

    let task = TimerTask::spawn(|stop| async move {
        stop.aborted().await;
        observed_clone.store(true, Ordering::SeqCst);
    });
    drain_tasks().await;

    drop(task);
    drain_tasks().await;
    assert!(observed.load(Ordering::SeqCst));
}
