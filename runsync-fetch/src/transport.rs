//! The request-issuing seam.
//!
//! Everything that talks to the backend goes through [`Transport`], which
//! turns a JSON POST into an [`ApiResponse`]: the HTTP status plus the body
//! parsed as JSON. Bodies that are not JSON come back as `Null` so callers
//! never have to care about the wire format of error pages.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::error::HttpError;
use crate::host::http::HttpClient;

// ============================================================================
// Response
// ============================================================================

/// A backend response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// JSON body, `Null` if the body was empty or not JSON.
    pub body: Value,
}

impl ApiResponse {
    /// Creates a response.
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// The `status` field embedded in the body.
    ///
    /// Accepts both numbers and numeric strings.
    pub fn body_status(&self) -> Option<i64> {
        match self.body.get("status")? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns true for a 2xx HTTP status.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Issues JSON POST requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `body` to `url`.
    async fn post_json(&self, url: &str, body: &Value) -> Result<ApiResponse, HttpError>;
}

#[async_trait]
impl Transport for HttpClient {
    async fn post_json(&self, url: &str, body: &Value) -> Result<ApiResponse, HttpError> {
        let response = HttpClient::post_json(self, url, body).await?;
        let status = response.status();
        let text = response.text().await?;

        let body = serde_json::from_str(&text).unwrap_or_else(|e| {
            debug!(url = %url, error = %e, len = text.len(), "Response body is not JSON");
            Value::Null
        });

        Ok(ApiResponse::new(status, body))
    }
}

// ============================================================================
// Scripted Transport
// ============================================================================

/// A [`Transport`] that replays queued responses and records requests.
#[cfg(any(test, feature = "test-util"))]
pub mod scripted {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::Value;

    use super::{ApiResponse, Transport};
    use crate::error::HttpError;

    /// A request seen by [`ScriptedTransport`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        /// Request URL.
        pub url: String,
        /// Request body.
        pub body: Value,
    }

    impl RecordedRequest {
        /// The `auth_token` the request carried.
        pub fn token(&self) -> Option<&str> {
            self.body.get("auth_token").and_then(Value::as_str)
        }
    }

    #[derive(Debug)]
    enum Reply {
        Response(ApiResponse),
        Failure(String),
    }

    /// Replays responses queued per URL, in order.
    ///
    /// An unscripted request gets a 500 with a `Null` body.
    #[derive(Debug, Default)]
    pub struct ScriptedTransport {
        replies: Mutex<HashMap<String, VecDeque<Reply>>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl ScriptedTransport {
        /// Creates an empty script.
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a response for `url`.
        pub fn respond(&self, url: &str, status: u16, body: Value) -> &Self {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            self.push(url, Reply::Response(ApiResponse::new(status, body)))
        }

        /// Queues a transport failure (no response at all) for `url`.
        pub fn fail(&self, url: &str, reason: &str) -> &Self {
            self.push(url, Reply::Failure(reason.to_string()))
        }

        fn push(&self, url: &str, reply: Reply) -> &Self {
            self.replies
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_default()
                .push_back(reply);
            self
        }

        /// All requests so far, in order.
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        /// Requests sent to `url`.
        pub fn requests_to(&self, url: &str) -> Vec<RecordedRequest> {
            self.requests()
                .into_iter()
                .filter(|r| r.url == url)
                .collect()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn post_json(&self, url: &str, body: &Value) -> Result<ApiResponse, HttpError> {
            self.requests.lock().unwrap().push(RecordedRequest {
                url: url.to_string(),
                body: body.clone(),
            });

            let reply = self
                .replies
                .lock()
                .unwrap()
                .get_mut(url)
                .and_then(VecDeque::pop_front);

            match reply {
                Some(Reply::Response(response)) => Ok(response),
                Some(Reply::Failure(reason)) => Err(HttpError::InvalidUrl(reason)),
                None => Ok(ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, Value::Null)),
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
