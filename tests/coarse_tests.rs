// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Medium-precision wrappers read the coarse wall clock, which does not
//! follow tokio's paused clock, so these tests run on real time with
//! generous margins.

use pacer::{debounce_coarse, throttle_coarse, DebounceOptions, RateError, ThrottleOptions};
use pacer_test_utils::Recorder;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test]
async fn test_throttle_coarse_coalesces_burst() -> anyhow::Result<()> {
    let recorder = Recorder::new();
    let rec = recorder.clone();
    let limiter = throttle_coarse(
        move |arg: &'static str| {
            rec.record(arg);
            async move { Ok(arg) }
        },
        Duration::from_millis(100),
        ThrottleOptions::new(),
    )?;

    let a = {
        let limiter = limiter.clone();
        tokio::spawn(async move { limiter.call("a").await })
    };
    let b = {
        let limiter = limiter.clone();
        tokio::spawn(async move { limiter.call("b").await })
    };
    let c = {
        let limiter = limiter.clone();
        tokio::spawn(async move { limiter.call("c").await })
    };

    recorder.wait_for(1).await;
    assert_eq!(recorder.calls(), vec!["a"]);

    recorder.wait_for(2).await;
    assert_eq!(recorder.calls(), vec!["a", "c"]);

    assert_eq!(a.await??, Some("a"));
    assert_eq!(b.await??, Some("c"));
    assert_eq!(c.await??, Some("c"));
    Ok(())
}

#[tokio::test]
async fn test_debounce_coarse_suppresses_burst() -> anyhow::Result<()> {
    let recorder = Recorder::new();
    let rec = recorder.clone();
    let limiter = debounce_coarse(
        move |arg: String| {
            rec.record(arg.clone());
            async move { Ok(arg) }
        },
        Duration::from_millis(100),
        DebounceOptions::new(),
    )?;

    let mut handles = Vec::new();
    for i in 0..5 {
        let limiter = limiter.clone();
        handles.push(tokio::spawn(async move {
            limiter.call(format!("arg{i}")).await
        }));
        sleep(Duration::from_millis(20)).await;
    }

    recorder.wait_for(1).await;
    sleep(Duration::from_millis(250)).await;
    assert_eq!(recorder.calls(), vec!["arg4".to_string()]);

    for handle in handles {
        assert_eq!(handle.await??, Some("arg4".to_string()));
    }
    Ok(())
}

#[tokio::test]
async fn test_coarse_cancel_rejects_pending() -> anyhow::Result<()> {
    let recorder = Recorder::new();
    let rec = recorder.clone();
    let limiter = throttle_coarse(
        move |arg: u32| {
            rec.record(arg);
            async { Ok(()) }
        },
        Duration::from_millis(200),
        ThrottleOptions::new().leading(false),
    )?;

    let pending = {
        let limiter = limiter.clone();
        tokio::spawn(async move { limiter.call(1).await })
    };
    // Let the call reach its pending slot before cancelling.
    sleep(Duration::from_millis(20)).await;
    assert!(limiter.is_pending());

    limiter.cancel();
    let err = pending.await?.unwrap_err();
    assert!(matches!(err, RateError::Cancelled));

    sleep(Duration::from_millis(300)).await;
    assert_eq!(recorder.count(), 0);
    Ok(())
}
