// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Prelude module re-exporting the constructors, options, and handle types.
//!
//! ```
//! use pacer::prelude::*;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> pacer::Result<()> {
//! let ping = throttle(
//!     |_: ()| async { Ok(()) },
//!     Duration::from_millis(250),
//!     ThrottleOptions::new(),
//! )?;
//! let _ = ping.call(()).await?;
//! # Ok(())
//! # }
//! ```

pub use crate::batch::{throttle_batch, BatchThrottle};
pub use crate::debounce::{debounce, debounce_coarse, Debounce};
pub use crate::fast::{debounce_fast, throttle_fast, FastDebounce, FastThrottle};
pub use crate::options::{BatchOptions, DebounceOptions, ThrottleOptions};
pub use crate::throttle::{throttle, throttle_coarse, Throttle};

pub use pacer_core::{AbortController, AbortSignal, CoarseClock, MonotonicClock};
pub use pacer_error::{RateError, Result};
