// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Rate-limited wrapper with throttle semantics.
//!
//! A throttle executes at most once per `wait` window. The first call of a
//! burst executes immediately on the leading edge (unless disabled); calls
//! arriving inside the window are coalesced onto a single trailing-edge
//! execution that fires with the newest arguments. Callers coalesced onto the
//! same scheduled execution all resolve with the same value.
//!
//! # Example
//!
//! ```
//! use pacer::{throttle, ThrottleOptions};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> pacer_error::Result<()> {
//! let search = throttle(
//!     |query: String| async move { Ok(format!("results for {query}")) },
//!     Duration::from_millis(100),
//!     ThrottleOptions::new(),
//! )?;
//!
//! // First call of the burst executes immediately.
//! let hits = search.call("rust".to_string()).await?;
//! assert_eq!(hits.as_deref(), Some("results for rust"));
//! # Ok(())
//! # }
//! ```

mod implementation;

pub use implementation::{throttle, throttle_coarse, Throttle};
