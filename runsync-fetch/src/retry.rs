//! Single re-authentication retry for backend requests.
//!
//! The backend signals an expired token with `status: 6` in the response
//! body, whatever the HTTP status. [`RetryOrchestrator::execute`] handles
//! exactly that case: it refreshes the token once, splices it into the
//! payload, and re-issues the request once. Nothing else is ever retried and
//! no request is ever issued a third time.

use std::sync::Arc;

use reqwest::StatusCode;
use runsync_core::CredentialStore;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::api::{ApiPayload, TOKEN_EXPIRED_STATUS};
use crate::auth::TokenRefresher;
use crate::error::FetchError;
use crate::transport::{ApiResponse, Transport};

// ============================================================================
// Attempt Classification
// ============================================================================

/// How a single response is interpreted.
#[derive(Debug)]
enum Attempt {
    Success(Value),
    Expired,
    Failed {
        status: StatusCode,
        body_status: Option<i64>,
    },
}

impl From<ApiResponse> for Attempt {
    fn from(response: ApiResponse) -> Self {
        let body_status = response.body_status();
        if body_status == Some(TOKEN_EXPIRED_STATUS) {
            Attempt::Expired
        } else if response.is_success() {
            Attempt::Success(response.body)
        } else {
            Attempt::Failed {
                status: response.status,
                body_status,
            }
        }
    }
}

// ============================================================================
// Retry Orchestrator
// ============================================================================

/// Issues backend requests with at most one token refresh.
pub struct RetryOrchestrator {
    transport: Arc<dyn Transport>,
    refresher: Arc<dyn TokenRefresher>,
}

impl RetryOrchestrator {
    /// Upper bound on requests issued per [`execute`](Self::execute) call.
    pub const MAX_ATTEMPTS: u32 = 2;

    /// Creates an orchestrator.
    pub fn new(transport: Arc<dyn Transport>, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self {
            transport,
            refresher,
        }
    }

    /// Sends `payload` to `url` with the stored credential.
    ///
    /// On an expiry signal the credential is refreshed, written back to
    /// `credentials`, and the request is re-sent once. Returns the response
    /// body on success.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Authentication`] if the refresh fails (fatal)
    /// - [`FetchError::TokenExpired`] if the retry is still rejected as expired
    /// - [`FetchError::Transient`] / [`FetchError::Http`] for anything else
    #[instrument(skip(self, credentials, payload), fields(url = %url))]
    pub async fn execute(
        &self,
        credentials: &mut dyn CredentialStore,
        url: &str,
        mut payload: ApiPayload,
    ) -> Result<Value, FetchError> {
        payload.set_token(credentials.get().as_ref());

        match self.attempt(url, &payload, 1).await? {
            Attempt::Success(body) => return Ok(body),
            Attempt::Failed {
                status,
                body_status,
            } => return Err(self.reject(url, &payload, 1, status, body_status)),
            Attempt::Expired => {
                info!("Token expired, re-authenticating");
            }
        }

        let fresh = self.refresher.refresh().await.map_err(|e| {
            error!(error = %e, "Re-authentication failed");
            FetchError::Authentication(e)
        })?;
        credentials.set(fresh);
        payload.set_token(credentials.get().as_ref());

        match self.attempt(url, &payload, 2).await? {
            Attempt::Success(body) => Ok(body),
            Attempt::Failed {
                status,
                body_status,
            } => Err(self.reject(url, &payload, 2, status, body_status)),
            Attempt::Expired => {
                warn!(
                    payload = %payload.redacted(),
                    attempt = 2,
                    "Token still expired after re-authentication, giving up"
                );
                Err(FetchError::TokenExpired {
                    url: url.to_string(),
                })
            }
        }
    }

    async fn attempt(
        &self,
        url: &str,
        payload: &ApiPayload,
        attempt: u32,
    ) -> Result<Attempt, FetchError> {
        debug!(attempt, "Sending request");

        match self.transport.post_json(url, &payload.to_value()).await {
            Ok(response) => Ok(Attempt::from(response)),
            Err(e) => {
                warn!(
                    payload = %payload.redacted(),
                    attempt,
                    error = %e,
                    "Request failed without a response"
                );
                Err(FetchError::Http(e))
            }
        }
    }

    fn reject(
        &self,
        url: &str,
        payload: &ApiPayload,
        attempt: u32,
        status: StatusCode,
        body_status: Option<i64>,
    ) -> FetchError {
        warn!(
            payload = %payload.redacted(),
            attempt,
            status = %status,
            body_status = ?body_status,
            "Request failed"
        );
        FetchError::Transient {
            url: url.to_string(),
            status: status.as_u16(),
            body_status,
        }
    }
}

impl std::fmt::Debug for RetryOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryOrchestrator")
            .field("max_attempts", &Self::MAX_ATTEMPTS)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
