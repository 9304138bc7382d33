// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pacer::{debounce, Debounce, DebounceOptions, RateError};
use pacer_test_utils::{drain_tasks, Recorder};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{advance, pause};

fn echo_debounce(
    recorder: &Recorder<String>,
    wait: Duration,
    options: DebounceOptions,
) -> Debounce<String, String> {
    let recorder = recorder.clone();
    debounce(
        move |arg: String| {
            recorder.record(arg.clone());
            async move { Ok(arg) }
        },
        wait,
        options,
    )
    .expect("valid configuration")
}

fn spawn_call(
    limiter: &Debounce<String, String>,
    arg: impl Into<String>,
) -> JoinHandle<pacer::Result<Option<String>>> {
    let limiter = limiter.clone();
    let arg = arg.into();
    tokio::spawn(async move { limiter.call(arg).await })
}

#[tokio::test]
async fn test_debounce_suppresses_burst_to_one_trailing_execution() -> anyhow::Result<()> {
    // Arrange
    pause();
    let recorder = Recorder::new();
    let limiter = echo_debounce(&recorder, Duration::from_millis(100), DebounceOptions::new());

    // Act: ten calls, 50ms apart, every gap shorter than `wait`.
    let mut handles = Vec::new();
    for i in 0..10 {
        handles.push(spawn_call(&limiter, format!("arg{i}")));
        drain_tasks().await;
        assert_eq!(recorder.count(), 0, "no execution inside the burst");
        if i < 9 {
            advance(Duration::from_millis(50)).await;
        }
    }
    advance(Duration::from_millis(100)).await;
    drain_tasks().await;

    // Assert: exactly one execution, with the final call's arguments.
    assert_eq!(recorder.calls(), vec!["arg9".to_string()]);
    for handle in handles {
        assert_eq!(handle.await??, Some("arg9".to_string()));
    }
    Ok(())
}

#[tokio::test]
async fn test_debounce_max_wait_forces_execution() -> anyhow::Result<()> {
    // Arrange
    pause();
    let recorder = Recorder::new();
    let limiter = echo_debounce(
        &recorder,
        Duration::from_millis(100),
        DebounceOptions::new().max_wait(Duration::from_millis(300)),
    );

    // Act: continuous pressure every 25ms for 500ms.
    let mut handles = Vec::new();
    for i in 0..20 {
        handles.push(spawn_call(&limiter, format!("arg{i}")));
        drain_tasks().await;
        if i == 12 {
            // t=300: max_wait forced an execution despite the ongoing burst.
            assert_eq!(recorder.count(), 1);
        }
        advance(Duration::from_millis(25)).await;
    }
    advance(Duration::from_millis(100)).await;
    drain_tasks().await;

    // Assert
    assert!(recorder.count() <= 3, "got {} executions", recorder.count());
    assert!(recorder.count() >= 1);
    for handle in handles {
        assert!(handle.await?.is_ok());
    }
    Ok(())
}

#[tokio::test]
async fn test_debounce_leading_executes_first_call_of_burst() -> anyhow::Result<()> {
    pause();
    let recorder = Recorder::new();
    let limiter = echo_debounce(
        &recorder,
        Duration::from_millis(100),
        DebounceOptions::new().leading(true),
    );

    // First call of the burst executes immediately.
    assert_eq!(
        limiter.call("first".to_string()).await?,
        Some("first".to_string())
    );
    assert_eq!(recorder.count(), 1);

    // Calls inside the window schedule the trailing edge instead.
    let follow_up = spawn_call(&limiter, "second");
    drain_tasks().await;
    assert!(limiter.is_pending());
    assert_eq!(recorder.count(), 1);

    advance(Duration::from_millis(100)).await;
    drain_tasks().await;
    assert_eq!(
        recorder.calls(),
        vec!["first".to_string(), "second".to_string()]
    );
    assert_eq!(follow_up.await??, Some("second".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_debounce_leading_only_short_circuits_inside_window() -> anyhow::Result<()> {
    pause();
    let recorder = Recorder::new();
    let limiter = echo_debounce(
        &recorder,
        Duration::from_millis(100),
        DebounceOptions::new().leading(true).trailing(false),
    );

    assert_eq!(
        limiter.call("lead".to_string()).await?,
        Some("lead".to_string())
    );
    // Inside the window nothing can fire: previous result, no pending slot,
    // no armed timer.
    assert_eq!(
        limiter.call("ignored".to_string()).await?,
        Some("lead".to_string())
    );
    assert!(!limiter.is_pending());

    advance(Duration::from_millis(200)).await;
    drain_tasks().await;
    assert_eq!(recorder.count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_debounce_timer_resets_on_every_call() -> anyhow::Result<()> {
    pause();
    let recorder = Recorder::new();
    let limiter = echo_debounce(&recorder, Duration::from_millis(100), DebounceOptions::new());

    let _a = spawn_call(&limiter, "a");
    drain_tasks().await;
    advance(Duration::from_millis(80)).await;
    assert_eq!(recorder.count(), 0);

    let _b = spawn_call(&limiter, "b");
    drain_tasks().await;
    // The first timer would have fired at t=100; the reset pushed it to t=180.
    advance(Duration::from_millis(20)).await;
    drain_tasks().await;
    assert_eq!(recorder.count(), 0);

    advance(Duration::from_millis(80)).await;
    drain_tasks().await;
    assert_eq!(recorder.calls(), vec!["b".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_debounce_cancel_discards_suppressed_args() -> anyhow::Result<()> {
    pause();
    let recorder = Recorder::new();
    let limiter = echo_debounce(&recorder, Duration::from_millis(100), DebounceOptions::new());

    let pending = spawn_call(&limiter, "doomed");
    drain_tasks().await;
    limiter.cancel();
    drain_tasks().await;

    let err = pending.await?.unwrap_err();
    assert!(matches!(err, RateError::Cancelled));

    // Unlike a throttle, a cancelled debounce forgets the burst: flush has
    // nothing to execute.
    assert_eq!(limiter.flush().await?, None);
    assert_eq!(recorder.count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_debounce_flush_executes_pending_args() -> anyhow::Result<()> {
    pause();
    let recorder = Recorder::new();
    let limiter = echo_debounce(&recorder, Duration::from_millis(100), DebounceOptions::new());

    let pending = spawn_call(&limiter, "now");
    drain_tasks().await;
    assert!(limiter.is_pending());

    assert_eq!(limiter.flush().await?, Some("now".to_string()));
    assert!(!limiter.is_pending());
    assert_eq!(pending.await??, Some("now".to_string()));
    assert_eq!(recorder.calls(), vec!["now".to_string()]);

    advance(Duration::from_millis(200)).await;
    drain_tasks().await;
    assert_eq!(recorder.count(), 1, "flushed timer must not fire again");
    Ok(())
}

#[tokio::test]
async fn test_debounce_without_edges_still_flushable() -> anyhow::Result<()> {
    pause();
    let recorder = Recorder::new();
    let limiter = echo_debounce(
        &recorder,
        Duration::from_millis(100),
        DebounceOptions::new().trailing(false),
    );

    // Neither edge enabled: calls execute nothing and report the previous
    // result, but the newest arguments stay retained for flush.
    assert_eq!(limiter.call("kept".to_string()).await?, None);
    assert_eq!(recorder.count(), 0);

    assert_eq!(limiter.flush().await?, Some("kept".to_string()));
    assert_eq!(recorder.calls(), vec!["kept".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_debounce_abort_rejects_and_fails_fast() -> anyhow::Result<()> {
    pause();
    let recorder = Recorder::new();
    let controller = pacer::AbortController::new();
    let limiter = echo_debounce(
        &recorder,
        Duration::from_millis(100),
        DebounceOptions::new().signal(controller.signal()),
    );

    let pending = spawn_call(&limiter, "x");
    drain_tasks().await;
    assert!(limiter.is_pending());

    controller.abort();
    drain_tasks().await;

    assert!(!limiter.is_pending());
    assert!(matches!(
        pending.await?.unwrap_err(),
        RateError::Aborted
    ));
    assert!(matches!(
        limiter.call("y".to_string()).await.unwrap_err(),
        RateError::Aborted
    ));
    assert_eq!(recorder.count(), 0);
    Ok(())
}
