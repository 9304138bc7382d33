// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The fast tier reads the coarse wall clock, so these tests run on real
//! time with generous margins instead of the paused tokio clock.

use pacer::{debounce_fast, throttle_fast, DebounceOptions, RateError, ThrottleOptions};
use pacer_test_utils::Recorder;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test]
async fn test_throttle_fast_leading_fires_and_burst_coalesces() -> anyhow::Result<()> {
    let recorder = Recorder::new();
    let rec = recorder.clone();
    let limiter = throttle_fast(
        move |arg: &'static str| {
            rec.record(arg);
            async { Ok(()) }
        },
        Duration::from_millis(100),
        ThrottleOptions::new(),
    )?;

    limiter.call("a");
    limiter.call("b");
    limiter.call("c");

    recorder.wait_for(1).await;
    assert_eq!(recorder.calls(), vec!["a"]);

    // Trailing edge fires with the newest arguments.
    recorder.wait_for(2).await;
    assert_eq!(recorder.calls(), vec!["a", "c"]);

    sleep(Duration::from_millis(250)).await;
    assert_eq!(recorder.count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_throttle_fast_leading_only_drops_suppressed_calls() -> anyhow::Result<()> {
    let recorder = Recorder::new();
    let rec = recorder.clone();
    let limiter = throttle_fast(
        move |arg: u32| {
            rec.record(arg);
            async { Ok(()) }
        },
        Duration::from_millis(100),
        ThrottleOptions::new().trailing(false),
    )?;

    limiter.call(1);
    limiter.call(2);
    limiter.call(3);

    recorder.wait_for(1).await;
    sleep(Duration::from_millis(300)).await;
    assert_eq!(recorder.calls(), vec![1]);
    Ok(())
}

#[tokio::test]
async fn test_debounce_fast_executes_once_after_quiet_period() -> anyhow::Result<()> {
    let recorder = Recorder::new();
    let rec = recorder.clone();
    let limiter = debounce_fast(
        move |arg: String| {
            rec.record(arg);
            async { Ok(()) }
        },
        Duration::from_millis(100),
        DebounceOptions::new(),
    )?;

    for i in 0..5 {
        limiter.call(format!("arg{i}"));
        sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(recorder.count(), 0, "no execution inside the burst");

    recorder.wait_for(1).await;
    sleep(Duration::from_millis(250)).await;
    assert_eq!(recorder.calls(), vec!["arg4".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_fast_failures_are_swallowed() -> anyhow::Result<()> {
    let recorder = Recorder::new();
    let rec = recorder.clone();
    let limiter = throttle_fast(
        move |arg: u32| {
            rec.record(arg);
            async {
                let outcome: pacer::Result<()> = Err(RateError::operation_msg("dropped"));
                outcome
            }
        },
        Duration::from_millis(50),
        ThrottleOptions::new(),
    )?;

    limiter.call(1);
    recorder.wait_for(1).await;

    // The failure was logged and dropped; the wrapper keeps working.
    sleep(Duration::from_millis(120)).await;
    limiter.call(2);
    recorder.wait_for(2).await;
    assert_eq!(recorder.calls(), vec![1, 2]);
    Ok(())
}

#[tokio::test]
async fn test_fast_abort_signal_drops_calls() -> anyhow::Result<()> {
    let recorder = Recorder::new();
    let rec = recorder.clone();
    let controller = pacer::AbortController::new();
    let limiter = throttle_fast(
        move |arg: u32| {
            rec.record(arg);
            async { Ok(()) }
        },
        Duration::from_millis(50),
        ThrottleOptions::new().signal(controller.signal()),
    )?;

    controller.abort();
    limiter.call(1);
    sleep(Duration::from_millis(150)).await;
    assert_eq!(recorder.count(), 0);
    Ok(())
}
