//! Run configuration.
//!
//! Everything comes from environment variables, optionally preloaded from a
//! `.env` file:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `EMAIL`, `PASSWORD` | Account used to log in |
//! | `AUTH_TOKEN` | Current token; empty means "log in first" |
//! | `REPO`, `GH_PAT` | Repository and token for publishing refreshed tokens |
//! | `AUTH_TOKEN_SECRET_NAME` | Secret to update (default `AUTH_TOKEN`) |
//! | `RUNSYNC_API_BASE` | Backend API base URL |
//! | `RUNSYNC_CLIENT_VERSION` | Client version reported to the backend |
//! | `RUNSYNC_OUTPUT_DIR` | Where documents are written (default `.`) |
//! | `RUNSYNC_TIMEOUT_SECS` | Per-request timeout (default 30) |

use runsync_core::Credential;
use runsync_fetch::{
    AccountCredentials, DEFAULT_API_BASE, DEFAULT_CLIENT_VERSION, DEFAULT_TIMEOUT_SECS,
    DEFAULT_TOKEN_SECRET, GITHUB_API_BASE,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::error::StoreError;

// ============================================================================
// Secret Store Config
// ============================================================================

/// Where refreshed tokens are published.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretStoreConfig {
    /// Repository, `owner/name`.
    pub repo: String,
    /// Access token for the secrets API.
    pub access_token: String,
    /// Secret to update.
    pub secret_name: String,
}

impl std::fmt::Debug for SecretStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretStoreConfig")
            .field("repo", &self.repo)
            .field("access_token", &"<redacted>")
            .field("secret_name", &self.secret_name)
            .finish()
    }
}

// ============================================================================
// Sync Config
// ============================================================================

/// Configuration of a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Backend API base URL.
    pub api_base: String,
    /// Client version reported to the backend.
    pub client_version: String,
    /// Output directory.
    pub output_dir: PathBuf,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Account used to log in.
    pub account: Option<AccountCredentials>,
    /// Token to start with.
    pub auth_token: Option<Credential>,
    /// Secret publication target.
    pub secret_store: Option<SecretStoreConfig>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            client_version: DEFAULT_CLIENT_VERSION.to_string(),
            output_dir: PathBuf::from("."),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            account: None,
            auth_token: None,
            secret_store: None,
        }
    }
}

impl SyncConfig {
    /// Loads a `.env` file into the process environment.
    ///
    /// With no explicit path, a missing `.env` in the working directory is
    /// not an error. Variables already set are never overridden.
    pub fn load_env_file(path: Option<&Path>) -> Result<(), StoreError> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| {
                    StoreError::Config(format!("cannot load {}: {e}", path.display()))
                })?;
                info!(path = %path.display(), "Loaded environment file");
            }
            None => {
                if let Ok(path) = dotenvy::dotenv() {
                    debug!(path = %path.display(), "Loaded environment file");
                }
            }
        }
        Ok(())
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let account = match (get("EMAIL"), get("PASSWORD")) {
            (Some(email), Some(password)) => Some(AccountCredentials::new(email, password)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(StoreError::Config("EMAIL is set but PASSWORD is not".into()));
            }
            (None, Some(_)) => {
                return Err(StoreError::Config("PASSWORD is set but EMAIL is not".into()));
            }
        };

        let secret_store = match (get("REPO"), get("GH_PAT")) {
            (Some(repo), Some(access_token)) => {
                if !repo.contains('/') {
                    return Err(StoreError::Config(format!(
                        "REPO must be owner/name, got {repo:?}"
                    )));
                }
                Some(SecretStoreConfig {
                    repo,
                    access_token,
                    secret_name: get("AUTH_TOKEN_SECRET_NAME")
                        .unwrap_or_else(|| DEFAULT_TOKEN_SECRET.to_string()),
                })
            }
            _ => None,
        };

        let timeout = match get("RUNSYNC_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse().map_err(|_| {
                StoreError::Config(format!("RUNSYNC_TIMEOUT_SECS must be a number, got {raw:?}"))
            })?),
            None => defaults.timeout,
        };

        Ok(Self {
            api_base: get("RUNSYNC_API_BASE").unwrap_or(defaults.api_base),
            client_version: get("RUNSYNC_CLIENT_VERSION").unwrap_or(defaults.client_version),
            output_dir: get("RUNSYNC_OUTPUT_DIR").map_or(defaults.output_dir, PathBuf::from),
            timeout,
            account,
            auth_token: get("AUTH_TOKEN").map(Credential::new),
            secret_store,
        })
    }

    /// Hosts requests may go to: the backend's, plus GitHub's if publishing.
    pub fn allowed_domains(&self) -> Result<Vec<String>, StoreError> {
        let mut domains = vec![host_of(&self.api_base)?];
        if self.secret_store.is_some() {
            domains.push(host_of(GITHUB_API_BASE)?);
        }
        Ok(domains)
    }
}

fn host_of(url: &str) -> Result<String, StoreError> {
    let parsed = Url::parse(url).map_err(|e| StoreError::Config(format!("invalid URL {url:?}: {e}")))?;
    parsed
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| StoreError::Config(format!("URL {url:?} has no host")))
}

// ============================================================================
// Tests
// ============================================================================
