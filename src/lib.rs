// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Asynchronous rate limiting for arbitrary async operations.
//!
//! `pacer` wraps an async operation and returns a rate-controlled surrogate
//! honouring one of two temporal policies, [`throttle`] (at most one
//! execution per window) or [`debounce`] (execute after a quiet period),
//! while preserving shared-result semantics: every caller coalesced onto the
//! same scheduled execution resolves with the same value. A [`throttle_batch`]
//! variant aggregates calls into fixed-size or time-bounded batches.
//!
//! # Precision tiers
//!
//! | Constructor | Clock | Result |
//! |---|---|---|
//! | [`throttle`] / [`debounce`] | monotonic | shared future |
//! | [`throttle_coarse`] / [`debounce_coarse`] | coarse wall clock | shared future |
//! | [`throttle_fast`] / [`debounce_fast`] | coarse wall clock | none (fire-and-forget) |
//!
//! The two future-carrying tiers share one state machine, generic over the
//! [`Clock`]; the fast tier trades the whole control surface
//! (`cancel`/`flush`/`is_pending`) for zero allocation per call.
//!
//! # Example
//!
//! ```
//! use pacer::{debounce, DebounceOptions};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() -> pacer::Result<()> {
//! let lookup = debounce(
//!     |query: String| async move { Ok(query.to_uppercase()) },
//!     Duration::from_millis(150),
//!     DebounceOptions::new(),
//! )?;
//!
//! // Concurrent callers coalesce onto one execution of the newest query.
//! let (a, b) = tokio::join!(
//!     lookup.call("first".to_string()),
//!     lookup.call("second".to_string()),
//! );
//! assert_eq!(a?, b?);
//! # Ok(())
//! # }
//! ```
//!
//! # Cancellation
//!
//! Wrappers accept an [`AbortSignal`] built from an [`AbortController`]
//! (plain, timeout-triggered, or combined from several signals). An abort
//! rejects every pending caller with [`RateError::Aborted`]; an explicit
//! `cancel()` rejects with [`RateError::Cancelled`] and leaves the wrapper
//! usable. Both answer `true` to [`RateError::is_abort_kind`].

pub mod batch;
pub mod debounce;
pub mod fast;
mod engine;
mod logging;
pub mod options;
pub mod prelude;
pub mod throttle;

pub use batch::{throttle_batch, BatchThrottle};
pub use debounce::{debounce, debounce_coarse, Debounce};
pub use fast::{debounce_fast, throttle_fast, FastDebounce, FastThrottle};
pub use options::{BatchOptions, DebounceOptions, ThrottleOptions};
pub use throttle::{throttle, throttle_coarse, Throttle};

pub use pacer_core::{
    AbortController, AbortSignal, Clock, CoarseClock, CoarseInstant, MonotonicClock, Slot,
    TimerTask,
};
pub use pacer_error::{RateError, Result};
