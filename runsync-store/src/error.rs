//! Store error types.

use runsync_fetch::{AuthError, FetchError, HttpError};
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend error that aborted the run.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns true if the error came from a failed login.
    pub fn is_authentication(&self) -> bool {
        matches!(self, StoreError::Fetch(FetchError::Authentication(_)))
    }
}

impl From<AuthError> for StoreError {
    fn from(err: AuthError) -> Self {
        StoreError::Fetch(FetchError::Authentication(err))
    }
}

impl From<HttpError> for StoreError {
    fn from(err: HttpError) -> Self {
        StoreError::Fetch(FetchError::Http(err))
    }
}
