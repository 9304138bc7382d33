// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the pacer rate-limiting library.
//!
//! This crate defines the root [`RateError`] type shared by every wrapper the
//! library constructs. The enum separates the two cancellation kinds (external
//! abort vs. explicit `cancel()`) from failures produced by the wrapped
//! operation itself, so callers can always tell *why* a pending invocation was
//! refused.
//!
//! `RateError` is `Clone`: a single settlement is broadcast to every caller
//! joined on the same scheduled execution, so the operation-failure payload is
//! reference-counted rather than boxed.
//!
//! # Examples
//!
//! ```
//! use pacer_error::{RateError, Result};
//!
//! fn refuse() -> Result<()> {
//!     Err(RateError::Aborted)
//! }
//!
//! assert!(refuse().unwrap_err().is_abort_kind());
//! ```

use std::sync::Arc;

/// Root error type for all pacer operations.
///
/// The first two variants are the cancellation kinds; both answer `true` to
/// [`is_abort_kind`](RateError::is_abort_kind), which is the discriminator
/// callers use to distinguish cancellation from a wrapped-operation failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RateError {
    /// The abort signal supplied at construction fired.
    ///
    /// Every caller pending on the wrapper at that moment is rejected with
    /// this variant, and subsequent invocations fail fast for as long as the
    /// signal stays aborted.
    #[error("operation aborted by signal")]
    Aborted,

    /// `cancel()` was called on the wrapper.
    ///
    /// Same rejection semantics as [`Aborted`](RateError::Aborted), but
    /// non-sticky: the wrapper accepts new invocations afterwards.
    #[error("pending execution cancelled")]
    Cancelled,

    /// The wrapped operation failed.
    ///
    /// The payload is shared so the identical failure reaches every caller
    /// joined on the slot that executed it.
    #[error("wrapped operation failed: {0}")]
    Operation(Arc<dyn std::error::Error + Send + Sync>),

    /// A constructor was given an unusable configuration.
    ///
    /// Raised for a zero `wait`, a `max_wait` shorter than `wait`, or a batch
    /// size of zero. Configuration is validated once, at construction; the
    /// running state machine never re-checks it.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the rejected configuration.
        message: String,
    },
}

impl RateError {
    /// Wrap a failure produced by the wrapped operation.
    pub fn operation(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Operation(Arc::new(error))
    }

    /// Wrap a plain message as an operation failure.
    ///
    /// Convenience for operations whose failures are strings rather than
    /// structured error types.
    pub fn operation_msg(message: impl Into<String>) -> Self {
        Self::Operation(Arc::from(
            Box::<dyn std::error::Error + Send + Sync>::from(message.into()),
        ))
    }

    /// Create an invalid-configuration error with the given message.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// `true` for both cancellation kinds ([`Aborted`](RateError::Aborted)
    /// and [`Cancelled`](RateError::Cancelled)).
    #[must_use]
    pub const fn is_abort_kind(&self) -> bool {
        matches!(self, Self::Aborted | Self::Cancelled)
    }

    /// `true` iff this error came from the wrapped operation itself.
    #[must_use]
    pub const fn is_operation_failure(&self) -> bool {
        matches!(self, Self::Operation(_))
    }

    /// `true` iff this error was raised at construction time.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}

/// Specialized `Result` for pacer operations.
pub type Result<T> = std::result::Result<T, RateError>;

/// Extension trait for lifting foreign failures into [`RateError`].
///
/// Implemented for any `Result` whose error type is a standard error, so
/// wrapped operations can end with a single `.into_rate()` instead of mapping
/// by hand.
pub trait ResultExt<T> {
    /// Convert the error, if any, into [`RateError::Operation`].
    ///
    /// # Errors
    /// Returns `Err(RateError::Operation(..))` when the underlying result is
    /// `Err`.
    fn into_rate(self) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_rate(self) -> Result<T> {
        self.map_err(RateError::operation)
    }
}
