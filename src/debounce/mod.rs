// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Rate-limited wrapper with debounce semantics.
//!
//! A debounce waits for a pause: every call restarts the timer, and only a
//! quiet period of `wait` lets the scheduled execution fire, with the newest
//! arguments. An optional `max_wait` bounds how long an uninterrupted burst
//! can keep postponing execution. With `leading` enabled, the first call of a
//! burst executes immediately instead.
//!
//! # Example
//!
//! ```
//! use pacer::{debounce, DebounceOptions};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() -> pacer_error::Result<()> {
//! let save = debounce(
//!     |text: String| async move { Ok(text.len()) },
//!     Duration::from_millis(100),
//!     DebounceOptions::new(),
//! )?;
//!
//! // Resolves once typing pauses for 100ms.
//! let saved = save.call("draft".to_string()).await?;
//! assert_eq!(saved, Some(5));
//! # Ok(())
//! # }
//! ```

mod implementation;

pub use implementation::{debounce, debounce_coarse, Debounce};
