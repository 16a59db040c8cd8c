//! Fetch error types.

use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for backend fetch operations.
///
/// Only [`FetchError::Authentication`] is fatal to a run; every other variant
/// means "skip this item and carry on".
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (connect error, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Re-authentication failed.
    #[error("Authentication failed: {0}")]
    Authentication(#[from] AuthError),

    /// Non-success response that is not a token expiry.
    #[error("Request to {url} failed with HTTP {status} (body status {body_status:?})")]
    Transient {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// The `status` field embedded in the response body, if any.
        body_status: Option<i64>,
    },

    /// The token was still reported as expired after re-authenticating.
    #[error("Token still expired after re-authentication for {url}")]
    TokenExpired {
        /// Request URL.
        url: String,
    },

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetchError {
    /// Returns true if the error must abort the run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::Authentication(_))
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid header value.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

// ============================================================================
// Auth Error
// ============================================================================

/// Error type for logins.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No email/password configured.
    #[error("No account credentials configured (set EMAIL and PASSWORD)")]
    MissingAccount,

    /// The login endpoint rejected the credentials.
    #[error("Login rejected with HTTP {status} (body status {body_status:?})")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// The `status` field embedded in the response body, if any.
        body_status: Option<i64>,
    },

    /// The login succeeded but carried no token.
    #[error("Login response did not contain an auth_token")]
    MissingToken,

    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
}

// ============================================================================
// Secret Error
// ============================================================================

/// Error type for secret publication.
#[derive(Debug, Error)]
pub enum SecretError {
    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Secret store replied with an unexpected status.
    #[error("Secret store returned HTTP {status} for {operation}")]
    UnexpectedStatus {
        /// What was being attempted.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// The repository public key could not be used.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Sealing the value failed.
    #[error("Encryption failed")]
    Encryption,

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SecretError {
    fn from(err: reqwest::Error) -> Self {
        SecretError::Http(HttpError::Request(err))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_authentication_is_fatal() {
        assert!(FetchError::Authentication(AuthError::MissingAccount).is_fatal());
        assert!(
            !FetchError::Transient {
                url: "u".to_string(),
                status: 500,
                body_status: None
            }
            .is_fatal()
        );
        assert!(!FetchError::TokenExpired { url: "u".to_string() }.is_fatal());
        assert!(!FetchError::Http(HttpError::InvalidUrl("x".to_string())).is_fatal());
    }
}
