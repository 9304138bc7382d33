// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pacer::{
    debounce, debounce_fast, throttle, throttle_batch, throttle_fast, BatchOptions,
    DebounceOptions, ThrottleOptions,
};
use std::time::Duration;

async fn noop(_: u32) -> pacer::Result<u32> {
    Ok(0)
}

async fn noop_unit(_: u32) -> pacer::Result<()> {
    Ok(())
}

async fn noop_batch(_: Vec<u32>) -> pacer::Result<()> {
    Ok(())
}

#[tokio::test]
async fn test_zero_wait_is_rejected() {
    let err = throttle(noop, Duration::ZERO, ThrottleOptions::new()).unwrap_err();
    assert!(err.is_config_error());

    let err = debounce(noop, Duration::ZERO, DebounceOptions::new()).unwrap_err();
    assert!(err.is_config_error());

    let err = throttle_fast(noop_unit, Duration::ZERO, ThrottleOptions::new()).unwrap_err();
    assert!(err.is_config_error());

    let err = throttle_batch(noop_batch, Duration::ZERO, BatchOptions::new()).unwrap_err();
    assert!(err.is_config_error());
}

#[tokio::test]
async fn test_max_wait_shorter_than_wait_is_rejected() {
    let wait = Duration::from_millis(100);
    let short = Duration::from_millis(50);

    let err = throttle(noop, wait, ThrottleOptions::new().max_wait(short)).unwrap_err();
    assert!(err.is_config_error());

    let err = debounce(noop, wait, DebounceOptions::new().max_wait(short)).unwrap_err();
    assert!(err.is_config_error());

    let err = debounce_fast(noop_unit, wait, DebounceOptions::new().max_wait(short)).unwrap_err();
    assert!(err.is_config_error());

    let err = throttle_batch(noop_batch, wait, BatchOptions::new().max_wait(short)).unwrap_err();
    assert!(err.is_config_error());
}

#[tokio::test]
async fn test_max_wait_equal_to_wait_is_accepted() {
    let wait = Duration::from_millis(100);
    assert!(throttle(noop, wait, ThrottleOptions::new().max_wait(wait)).is_ok());
    assert!(debounce(noop, wait, DebounceOptions::new().max_wait(wait)).is_ok());
}

#[tokio::test]
async fn test_zero_batch_size_is_rejected() {
    let err = throttle_batch(
        noop_batch,
        Duration::from_millis(100),
        BatchOptions::new().batch_size(0),
    )
    .unwrap_err();
    assert!(err.is_config_error());
}

#[tokio::test]
async fn test_option_defaults() {
    let throttle_options = ThrottleOptions::new();
    assert!(throttle_options.leading);
    assert!(throttle_options.trailing);
    assert!(throttle_options.max_wait.is_none());

    let debounce_options = DebounceOptions::new();
    assert!(!debounce_options.leading);
    assert!(debounce_options.trailing);

    let batch_options = BatchOptions::new();
    assert_eq!(batch_options.batch_size, 10);
    assert!(batch_options.max_wait.is_none());
}
