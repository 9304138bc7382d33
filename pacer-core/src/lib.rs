// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime primitives shared by every pacer wrapper.
//!
//! The rate-limiting engines are thin state machines; everything they lean on
//! lives here:
//!
//! - [`AbortSignal`] / [`AbortController`] - external cancellation, including
//!   a timeout-triggered controller and an any-of combinator
//! - [`Slot`] - a single-producer, multi-consumer one-shot cell that fans one
//!   execution result out to every caller joined on the same scheduled slot
//! - [`TimerTask`] - a spawned task handle that cancels cooperatively when
//!   dropped, used for trailing-edge timers and abort watchers
//! - [`Clock`] - the precision-tier seam: [`MonotonicClock`] for the high
//!   tier, [`CoarseClock`] for the medium and low tiers

pub mod abort;
pub mod clock;
pub mod slot;
pub mod task;

pub use abort::{AbortController, AbortSignal, Aborted};
pub use clock::{Clock, CoarseClock, CoarseInstant, MonotonicClock};
pub use slot::{Settled, Slot};
pub use task::TimerTask;
