//! Error types for value conversions.

use thiserror::Error;

/// A [`crate::Value`] could not be converted into the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} value, got {actual}")]
pub struct ValueTypeError {
    /// The kind the caller asked for.
    pub expected: &'static str,
    /// The kind the value actually holds.
    pub actual: &'static str,
}

impl ValueTypeError {
    /// Creates a conversion error from the expected and actual kinds.
    #[must_use]
    pub const fn new(expected: &'static str, actual: &'static str) -> Self {
        Self { expected, actual }
    }
}
