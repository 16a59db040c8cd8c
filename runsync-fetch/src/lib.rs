// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # runsync Fetch
//!
//! Network access for `runsync`.
//!
//! ## Host APIs
//!
//! The [`host`] module wraps the outside world:
//!
//! - [`host::http`] - HTTP client with tracing and domain allowlist
//! - [`host::secrets`] - The `update_secret(name, value)` seam
//! - [`host::github`] - GitHub Actions secrets with sealed-box encryption
//!
//! ## Backend Access
//!
//! - [`transport::Transport`] - The request-issuing seam used by everything below
//! - [`api`] - Endpoints and request payloads
//! - [`auth::Authenticator`] - Exchanges account credentials for a token
//! - [`retry::RetryOrchestrator`] - Single re-authentication + single retry
//! - [`backend::Backend`] - Location and product endpoints behind the orchestrator
//!
//! ## Example
//!
//! ```ignore
//! use runsync_fetch::{Authenticator, Backend, Endpoints, HttpClient, RetryOrchestrator};
//!
//! let transport = Arc::new(HttpClient::new()?);
//! let endpoints = Endpoints::from_base(DEFAULT_API_BASE);
//! let auth = Arc::new(Authenticator::new(transport.clone(), &endpoints, client.clone(), account));
//! let backend = Backend::new(RetryOrchestrator::new(transport, auth), endpoints, client);
//!
//! let body = backend.list_locations(&mut credentials, LocationSet::OrderingEnabled).await?;
//! ```

// Core modules
pub mod api;
pub mod auth;
pub mod backend;
pub mod error;
pub mod host;
pub mod retry;
pub mod transport;

// Re-export key types at crate root

// Errors
pub use error::{AuthError, FetchError, HttpError, SecretError};

// Host APIs
pub use host::{
    github::{GITHUB_API_BASE, GithubSecretStore, seal_secret},
    http::{DEFAULT_TIMEOUT_SECS, HttpClient},
    secrets::SecretStore,
};

// Backend access
pub use api::{
    ApiPayload, ClientInfo, DEFAULT_API_BASE, DEFAULT_CLIENT_VERSION, Endpoints,
    LOGIN_SUCCESS_STATUS, TOKEN_EXPIRED_STATUS,
};
pub use auth::{AccountCredentials, Authenticator, DEFAULT_TOKEN_SECRET, TokenRefresher};
pub use backend::Backend;
pub use retry::RetryOrchestrator;
pub use transport::{ApiResponse, Transport};

#[cfg(any(test, feature = "test-util"))]
pub use transport::scripted::{RecordedRequest, ScriptedTransport};
