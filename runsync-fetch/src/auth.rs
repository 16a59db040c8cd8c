//! Login and token refresh.
//!
//! The [`Authenticator`] exchanges the account's email and password for a new
//! `auth_token`. A refreshed token is handed to the configured
//! [`SecretStore`] so the next scheduled run starts with it.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use runsync_core::Credential;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::api::{ApiPayload, ClientInfo, Endpoints, LOGIN_SUCCESS_STATUS};
use crate::error::AuthError;
use crate::host::secrets::SecretStore;
use crate::transport::Transport;

/// Default name of the secret holding the token.
pub const DEFAULT_TOKEN_SECRET: &str = "AUTH_TOKEN";

// ============================================================================
// Account Credentials
// ============================================================================

/// Account email and password.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountCredentials {
    /// Account email.
    pub email: String,
    password: String,
}

impl AccountCredentials {
    /// Creates account credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// The account password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Token Refresher
// ============================================================================

/// Produces a fresh credential on demand.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Obtains a new credential. Failure is fatal to the caller.
    async fn refresh(&self) -> Result<Credential, AuthError>;
}

// ============================================================================
// Authenticator
// ============================================================================

struct SecretTarget {
    store: Arc<dyn SecretStore>,
    name: String,
}

/// Logs in against the backend.
pub struct Authenticator {
    transport: Arc<dyn Transport>,
    login_url: String,
    client: ClientInfo,
    account: Option<AccountCredentials>,
    secret: Option<SecretTarget>,
}

impl Authenticator {
    /// Creates an authenticator. Without `account`, every login fails.
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoints: &Endpoints,
        client: ClientInfo,
        account: Option<AccountCredentials>,
    ) -> Self {
        Self {
            transport,
            login_url: endpoints.login.clone(),
            client,
            account,
            secret: None,
        }
    }

    /// Publishes refreshed tokens to `store` under `name`.
    pub fn with_secret_store(mut self, store: Arc<dyn SecretStore>, name: impl Into<String>) -> Self {
        self.secret = Some(SecretTarget {
            store,
            name: name.into(),
        });
        self
    }

    /// Logs in and returns the new credential.
    ///
    /// Success is a 2xx response whose body carries a non-empty `auth_token`
    /// and either no `status` or the success status.
    #[instrument(skip(self), fields(url = %self.login_url))]
    pub async fn login(&self) -> Result<Credential, AuthError> {
        let account = self.account.as_ref().ok_or(AuthError::MissingAccount)?;
        debug!(email = %account.email, "Logging in");

        let payload = ApiPayload::login(&self.client, account);
        let response = self
            .transport
            .post_json(&self.login_url, &payload.to_value())
            .await?;

        let body_status = response.body_status();
        let accepted = response.is_success()
            && body_status.is_none_or(|status| status == LOGIN_SUCCESS_STATUS);

        if !accepted {
            warn!(
                status = %response.status,
                body_status = ?body_status,
                "Login rejected"
            );
            return Err(AuthError::Rejected {
                status: response.status.as_u16(),
                body_status,
            });
        }

        let token = response
            .body
            .get("auth_token")
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .ok_or(AuthError::MissingToken)?;

        info!("Login successful, new auth token obtained");
        Ok(Credential::new(token))
    }

    /// Hands the credential to the secret store, if one is configured.
    ///
    /// Failures are logged and swallowed: the token is valid in memory either way.
    async fn publish(&self, credential: &Credential) {
        let Some(target) = &self.secret else {
            debug!("No secret store configured, refreshed token kept in memory only");
            return;
        };

        match target.store.update_secret(&target.name, credential.as_str()).await {
            Ok(()) => info!(secret = %target.name, "Published refreshed token"),
            Err(e) => error!(
                secret = %target.name,
                error = %e,
                "Failed to publish refreshed token; the next run may start with a stale one"
            ),
        }
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("login_url", &self.login_url)
            .field("client", &self.client)
            .field("account", &self.account)
            .field("publishes_secret", &self.secret.as_ref().map(|s| s.name.as_str()))
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenRefresher for Authenticator {
    async fn refresh(&self) -> Result<Credential, AuthError> {
        let credential = self.login().await?;
        self.publish(&credential).await;
        Ok(credential)
    }
}

// ============================================================================
// Tests
// ============================================================================
