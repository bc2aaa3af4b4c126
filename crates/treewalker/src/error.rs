//! Error types owned by the walker itself.
//!
//! Callback failures are never wrapped: a walk fails with the callback's own
//! error type. The errors here only come from decoding signals.

use thiserror::Error;

/// Errors that can occur while decoding a [`Signal`](crate::Signal).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The numeric code does not name a signal.
    #[error("Unknown signal code: {0}")]
    UnknownCode(i32),

    /// The name does not name a signal.
    #[error("Unknown signal name: {0}")]
    UnknownName(String),
}

impl SignalError {
    /// Creates an unknown-name error.
    pub fn unknown_name(name: impl Into<String>) -> Self {
        Self::UnknownName(name.into())
    }
}
