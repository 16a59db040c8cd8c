//! Bearer credential and its store.
//!
//! The backend identifies a session by an opaque `auth_token` string that
//! rotates whenever the backend decides it has expired. The token is held in
//! a [`CredentialStore`] which is passed explicitly to whatever needs it; there
//! is no process-wide token.

use std::fmt;

// ============================================================================
// Credential
// ============================================================================

/// Opaque bearer token.
///
/// `Debug` output never contains the token itself.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credential(String);

impl Credential {
    /// Wraps a token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential(<redacted>)")
        }
    }
}

// ============================================================================
// Credential Store
// ============================================================================

/// Holds the current credential.
///
/// Implementations are only required to keep the token for the lifetime of
/// the process; persisting it elsewhere (a CI secret, for example) is the
/// job of the caller that receives a refreshed token.
pub trait CredentialStore: Send {
    /// Returns the current credential, if one is set.
    fn get(&self) -> Option<Credential>;

    /// Replaces the current credential wholesale.
    fn set(&mut self, credential: Credential);
}

/// In-memory credential store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    current: Option<Credential>,
    replacements: u32,
}

impl MemoryCredentialStore {
    /// Creates a store seeded with an optional token.
    ///
    /// Empty tokens are treated as absent.
    pub fn new(initial: Option<Credential>) -> Self {
        Self {
            current: initial.filter(|c| !c.is_empty()),
            replacements: 0,
        }
    }

    /// Number of times [`CredentialStore::set`] replaced the credential.
    pub fn replacements(&self) -> u32 {
        self.replacements
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.current.clone()
    }

    fn set(&mut self, credential: Credential) {
        self.current = Some(credential);
        self.replacements += 1;
    }
}

// ============================================================================
// Tests
// ============================================================================
