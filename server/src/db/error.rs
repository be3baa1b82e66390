//! Collaborator Backend Errors

use thiserror::Error;

/// Failure reported by a persistence-backed collaborator (store, lookup,
/// permission evaluator or audit sink).
#[derive(Debug, Error)]
pub enum BackendError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Collaborator could not serve the request.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for collaborator calls.
pub type BackendResult<T> = Result<T, BackendError>;
