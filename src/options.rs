// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Wrapper configuration.
//!
//! Throttle and debounce accept the same four knobs and differ only in
//! defaults: a throttle fires on the leading edge unless told otherwise, a
//! debounce does not. Configuration is validated once, when the wrapper is
//! constructed; the running state machine never re-checks it.

use pacer_core::AbortSignal;
use pacer_error::{RateError, Result};
use std::time::Duration;

/// Default batch size for [`throttle_batch`](crate::throttle_batch).
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default `max_wait` multiple of `wait` for
/// [`throttle_batch`](crate::throttle_batch).
pub const DEFAULT_BATCH_MAX_WAIT_FACTOR: u32 = 3;

/// Configuration for [`throttle`](crate::throttle) and its tier variants.
///
/// Defaults: `leading` and `trailing` both enabled, no `max_wait`, no abort
/// signal.
///
/// # Example
///
/// ```
/// use pacer::ThrottleOptions;
/// use std::time::Duration;
///
/// let options = ThrottleOptions::new()
///     .leading(false)
///     .max_wait(Duration::from_millis(500));
/// assert!(options.trailing);
/// ```
#[derive(Clone, Debug)]
pub struct ThrottleOptions {
    /// Execute at window start with the first call of a new burst.
    pub leading: bool,
    /// Execute at window end with the newest suppressed arguments.
    pub trailing: bool,
    /// Force execution within this duration of the reference point.
    pub max_wait: Option<Duration>,
    /// External cancellation source; preempts any pending work.
    pub signal: Option<AbortSignal>,
}

impl ThrottleOptions {
    /// Throttle defaults: leading and trailing both on.
    pub fn new() -> Self {
        Self {
            leading: true,
            trailing: true,
            max_wait: None,
            signal: None,
        }
    }

    /// Set whether the leading edge executes.
    #[must_use]
    pub fn leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    /// Set whether the trailing edge executes.
    #[must_use]
    pub fn trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }

    /// Bound the delay of a suppressed burst.
    #[must_use]
    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Attach an external abort signal.
    #[must_use]
    pub fn signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }
}

impl Default for ThrottleOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for [`debounce`](crate::debounce) and its tier variants.
///
/// Defaults: `trailing` enabled, `leading` disabled, no `max_wait`, no abort
/// signal.
#[derive(Clone, Debug)]
pub struct DebounceOptions {
    /// Execute immediately with the first call of a new burst.
    pub leading: bool,
    /// Execute after a quiet period with the newest arguments.
    pub trailing: bool,
    /// Force execution within this duration of the reference point.
    pub max_wait: Option<Duration>,
    /// External cancellation source; preempts any pending work.
    pub signal: Option<AbortSignal>,
}

impl DebounceOptions {
    /// Debounce defaults: trailing only.
    pub fn new() -> Self {
        Self {
            leading: false,
            trailing: true,
            max_wait: None,
            signal: None,
        }
    }

    /// Set whether the leading edge executes.
    #[must_use]
    pub fn leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    /// Set whether the trailing edge executes.
    #[must_use]
    pub fn trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }

    /// Bound the delay of a suppressed burst.
    #[must_use]
    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Attach an external abort signal.
    #[must_use]
    pub fn signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }
}

impl Default for DebounceOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for [`throttle_batch`](crate::throttle_batch).
#[derive(Clone, Debug)]
pub struct BatchOptions {
    /// Flush as soon as this many calls have accumulated.
    pub batch_size: usize,
    /// Flush any non-empty buffer older than this. Defaults to
    /// [`DEFAULT_BATCH_MAX_WAIT_FACTOR`] times `wait`.
    pub max_wait: Option<Duration>,
}

impl BatchOptions {
    /// Batch defaults: [`DEFAULT_BATCH_SIZE`] items, derived `max_wait`.
    pub fn new() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_wait: None,
        }
    }

    /// Set the size threshold.
    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the age threshold.
    #[must_use]
    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_wait(wait: Duration) -> Result<()> {
    if wait.is_zero() {
        return Err(RateError::invalid_config("wait must be positive"));
    }
    Ok(())
}

pub(crate) fn validate_max_wait(wait: Duration, max_wait: Option<Duration>) -> Result<()> {
    if let Some(max_wait) = max_wait {
        if max_wait < wait {
            return Err(RateError::invalid_config(
                "max_wait must be at least as long as wait",
            ));
        }
    }
    Ok(())
}

pub(crate) fn validate_batch_size(batch_size: usize) -> Result<()> {
    if batch_size < 1 {
        return Err(RateError::invalid_config("batch_size must be at least 1"));
    }
    Ok(())
}
