//! Failure taxonomy for the metric query path

use thiserror::Error;

/// Errors from the profile lookup service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("workload profile {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    #[error("profile lookup unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned to metric query callers.
///
/// All failures are terminal for the call; nothing is retried internally and
/// no partial result is ever returned.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request is malformed; retrying without fixing it will not help
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The request is well-formed but no matching data exists yet
    #[error("no metric found: {0}")]
    NotFound(String),

    /// The profile lookup itself failed, propagated unchanged
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl StoreError {
    /// Whether the same request may succeed later as data appears
    pub fn is_retryable(&self) -> bool {
        !matches!(self, StoreError::InvalidQuery(_))
    }
}
