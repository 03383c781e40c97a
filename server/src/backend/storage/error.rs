//! Errors surfaced by document store backends.

use thiserror::Error;

/// Failure reported by a document store
///
/// Callers receive these unmodified: nothing in the record helpers retries,
/// backs off or rewrites a store failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Transport, I/O or query failure
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
    /// The store's access rules rejected the request
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    /// Malformed path, query or stored document
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::BackendUnavailable(err.to_string())
    }
}
