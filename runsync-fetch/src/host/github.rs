//! GitHub Actions secrets backend.
//!
//! Updating a repository secret takes two calls:
//!
//! 1. **Key**: GET `/repos/{repo}/actions/secrets/public-key` for the
//!    repository's X25519 public key and its id
//! 2. **Put**: PUT `/repos/{repo}/actions/secrets/{name}` with the value
//!    sealed to that key, base64 encoded
//!
//! Sealing uses libsodium's `crypto_box_seal` construction, which is what
//! GitHub decrypts on its side.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use crypto_box::{PublicKey, aead::OsRng};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::http::HttpClient;
use super::secrets::SecretStore;
use crate::error::{HttpError, SecretError};

// ============================================================================
// Constants
// ============================================================================

/// GitHub REST API base URL.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// X25519 public key length.
const PUBLIC_KEY_SIZE: usize = 32;

/// Media type GitHub expects for the secrets API.
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

// ============================================================================
// API Types
// ============================================================================

/// Repository public key used to seal secrets.
#[derive(Debug, Deserialize)]
struct RepoPublicKey {
    key_id: String,
    key: String,
}

/// Body of the secret PUT.
#[derive(Debug, Serialize)]
struct EncryptedSecret<'a> {
    encrypted_value: &'a str,
    key_id: &'a str,
}

// ============================================================================
// Secret Store
// ============================================================================

/// Writes secrets into a GitHub repository's Actions secrets.
#[derive(Debug, Clone)]
pub struct GithubSecretStore {
    http: HttpClient,
    api_base: String,
    repo: String,
    access_token: String,
}

impl GithubSecretStore {
    /// Creates a store for `repo` (`owner/name`) authenticated with a token.
    pub fn new(http: HttpClient, repo: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http,
            api_base: GITHUB_API_BASE.to_string(),
            repo: repo.into(),
            access_token: access_token.into(),
        }
    }

    /// Overrides the API base URL (GitHub Enterprise).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn public_key_url(&self) -> String {
        format!("{}/repos/{}/actions/secrets/public-key", self.api_base, self.repo)
    }

    fn secret_url(&self, name: &str) -> String {
        format!("{}/repos/{}/actions/secrets/{}", self.api_base, self.repo, name)
    }

    fn build_headers(&self) -> Result<HeaderMap, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        let auth_value = format!("Bearer {}", self.access_token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| HttpError::InvalidHeader(e.to_string()))?,
        );

        Ok(headers)
    }

    async fn fetch_public_key(&self) -> Result<RepoPublicKey, SecretError> {
        let response = self
            .http
            .get_with_headers(&self.public_key_url(), self.build_headers()?)
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SecretError::UnexpectedStatus {
                operation: "public key lookup",
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl SecretStore for GithubSecretStore {
    #[instrument(skip(self, value), fields(repo = %self.repo))]
    async fn update_secret(&self, name: &str, value: &str) -> Result<(), SecretError> {
        let public_key = self.fetch_public_key().await?;
        debug!(key_id = %public_key.key_id, "Fetched repository public key");

        let encrypted_value = seal_secret(&public_key.key, value)?;
        let body = EncryptedSecret {
            encrypted_value: &encrypted_value,
            key_id: &public_key.key_id,
        };

        let response = self
            .http
            .put_json_with_headers(&self.secret_url(name), self.build_headers()?, &body)
            .await?;

        let status = response.status();
        if status == StatusCode::CREATED || status == StatusCode::NO_CONTENT {
            info!(secret = %name, "Secret updated");
            Ok(())
        } else {
            Err(SecretError::UnexpectedStatus {
                operation: "secret update",
                status: status.as_u16(),
            })
        }
    }
}

// ============================================================================
// Sealing
// ============================================================================

/// Seals `value` to a base64 X25519 public key and returns base64 ciphertext.
pub fn seal_secret(public_key_b64: &str, value: &str) -> Result<String, SecretError> {
    let raw = STANDARD
        .decode(public_key_b64.trim())
        .map_err(|e| SecretError::InvalidPublicKey(e.to_string()))?;

    let bytes: [u8; PUBLIC_KEY_SIZE] = raw.as_slice().try_into().map_err(|_| {
        SecretError::InvalidPublicKey(format!("expected {PUBLIC_KEY_SIZE} bytes, got {}", raw.len()))
    })?;

    let sealed = PublicKey::from(bytes)
        .seal(&mut OsRng, value.as_bytes())
        .map_err(|_| SecretError::Encryption)?;

    Ok(STANDARD.encode(sealed))
}

// ============================================================================
// Tests
// ============================================================================
