//! Host APIs for interacting with the outside world.
//!
//! - [`http`] - HTTP client with tracing and domain allowlist
//! - [`secrets`] - Secret store seam for refreshed tokens
//! - [`github`] - GitHub Actions secrets backend

pub mod github;
pub mod http;
pub mod secrets;
