//! Secret store seam.
//!
//! A refreshed token has to outlive the process so the next scheduled run
//! starts with it. Where it goes is up to the [`SecretStore`] implementation.

use async_trait::async_trait;

use crate::error::SecretError;

/// External store for named secrets.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Creates or replaces the secret `name` with `value`.
    async fn update_secret(&self, name: &str, value: &str) -> Result<(), SecretError>;
}
