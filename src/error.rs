//! Error types.
//!
//! Host adapters report failures as [`HostError`]. The engine wraps them in
//! [`Error`] and propagates them out of the scheduler tick that hit them;
//! nothing is retried or rolled back. Malformed input is reported as
//! [`Error::Invariant`] before any fiber is built from it.

use thiserror::Error;

/// Failure reported by a host adapter capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("unknown host node `{0}`")]
    UnknownNode(String),

    #[error("host node `{child}` is not a child of `{parent}`")]
    NotAChild { parent: String, child: String },

    /// Text nodes carry neither children nor listeners.
    #[error("host node `{0}` is not an element")]
    NotAnElement(String),

    #[error("host rejected the operation: {0}")]
    Rejected(String),
}

/// Engine error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("host adapter failed: {0}")]
    Host(#[from] HostError),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fail with [`Error::Invariant`] unless `condition` holds.
pub(crate) fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::Invariant(message()))
    }
}
