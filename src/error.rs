//! Error types for the memoization cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for key derivation and configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// An argument could not be lowered into a stable, comparable key
    #[error("Unhashable argument: {0}")]
    UnhashableKey(String),

    /// The same keyword argument was supplied more than once
    #[error("Duplicate keyword argument: {0}")]
    DuplicateArgument(String),

    /// A configuration value could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Call Error Enum ==
/// Outcome of a failed call through a memoized function.
///
/// Key errors are raised before the wrapped function runs. Computation
/// errors carry the wrapped function's own error untouched.
#[derive(Error, Debug)]
pub enum CallError<E> {
    /// Key derivation failed; nothing was computed or stored
    #[error(transparent)]
    Key(#[from] CacheError),

    /// The wrapped computation failed; nothing was stored
    #[error("Computation failed: {0}")]
    Compute(E),
}

impl<E> CallError<E> {
    // == Into Compute ==
    /// Returns the computation error, if this is one.
    pub fn into_compute(self) -> Option<E> {
        match self {
            CallError::Compute(err) => Some(err),
            CallError::Key(_) => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
