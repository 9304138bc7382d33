// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Clock sources for the precision tiers.
//!
//! The engines are generic over [`Clock`], which is the whole difference
//! between the high and medium precision tiers: [`MonotonicClock`] reads the
//! monotonic process clock, [`CoarseClock`] reads the wall clock at
//! millisecond granularity. Neither source tolerates negative gaps; elapsed
//! time saturates to zero.

use std::fmt::Debug;
use std::ops::Sub;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A source of instants the engines measure elapsed time with.
pub trait Clock: Clone + Default + Debug + Send + Sync + 'static {
    /// The instant type produced by this clock.
    type Instant: Copy
        + Debug
        + Ord
        + Send
        + Sync
        + Sub<Self::Instant, Output = Duration>
        + 'static;

    /// The current instant.
    fn now(&self) -> Self::Instant;
}

/// High-precision monotonic clock backed by [`tokio::time::Instant`].
///
/// Immune to wall-clock adjustments; subtraction of a later instant from an
/// earlier one saturates to [`Duration::ZERO`]. Reading through tokio's
/// instant keeps scheduling decisions coherent with tokio's timers,
/// including under `tokio::time::pause()` in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    type Instant = tokio::time::Instant;

    fn now(&self) -> Self::Instant {
        tokio::time::Instant::now()
    }
}

/// Millisecond-granular wall-clock instant.
///
/// Subtraction saturates: a backwards wall-clock step reads as zero elapsed,
/// never as a panic or an underflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoarseInstant(u64);

impl CoarseInstant {
    /// Milliseconds since the UNIX epoch (zero for pre-epoch clocks).
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Build an instant from a raw millisecond count.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    fn from_wall_clock() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0);
        Self(millis)
    }
}

impl Sub for CoarseInstant {
    type Output = Duration;

    fn sub(self, earlier: Self) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

/// Coarse wall clock used by the medium and low precision tiers.
///
/// Trades monotonicity and sub-millisecond resolution for a cheaper read;
/// scheduling decisions may drift by one clock tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoarseClock;

impl Clock for CoarseClock {
    type Instant = CoarseInstant;

    fn now(&self) -> Self::Instant {
        CoarseInstant::from_wall_clock()
    }
}
