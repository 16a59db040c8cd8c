//! Backend endpoints and request payloads.
//!
//! Every request is a JSON POST. Besides its own fields, each payload carries
//! the client identification fields the mobile app sends (`api_key`,
//! `client_version`, `client_os`) and the current `auth_token`.

use runsync_core::{Credential, LocationId, LocationSet};
use serde_json::{Map, Value};

use crate::auth::AccountCredentials;

// ============================================================================
// Constants
// ============================================================================

/// Production API base URL.
pub const DEFAULT_API_BASE: &str = "https://app2.ontherun.com.au/api/v2";

/// Client version reported to the backend.
pub const DEFAULT_CLIENT_VERSION: &str = "3.7.160";

/// Body `status` the backend uses for an expired token.
pub const TOKEN_EXPIRED_STATUS: i64 = 6;

/// Body `status` of a successful login.
pub const LOGIN_SUCCESS_STATUS: i64 = 1;

/// The app sends the literal string "null" for unset fields.
const NULL_FIELD: &str = "null";

/// Payload fields whose values must never reach the logs.
const SENSITIVE_FIELDS: &[&str] = &["auth_token", "password"];

// ============================================================================
// Endpoints
// ============================================================================

/// The three backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Login.
    pub login: String,
    /// Location lists.
    pub list_locations: String,
    /// Per-location product catalog.
    pub list_products: String,
}

impl Endpoints {
    /// Builds the endpoints under an API base URL.
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            login: format!("{base}/login"),
            list_locations: format!("{base}/listLocations"),
            list_products: format!("{base}/listOrderingEnabledBrandProductsFull"),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_base(DEFAULT_API_BASE)
    }
}

// ============================================================================
// Client Info
// ============================================================================

/// Client identification sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    /// Reported app version.
    pub client_version: String,
}

impl ClientInfo {
    /// Creates client info for a given app version.
    pub fn new(client_version: impl Into<String>) -> Self {
        Self {
            client_version: client_version.into(),
        }
    }
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self::new(DEFAULT_CLIENT_VERSION)
    }
}

// ============================================================================
// Payload
// ============================================================================

/// A request payload with an `auth_token` slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiPayload(Map<String, Value>);

impl ApiPayload {
    fn base(client: &ClientInfo) -> Self {
        let mut map = Map::new();
        map.insert("api_key".into(), NULL_FIELD.into());
        map.insert("client_version".into(), client.client_version.as_str().into());
        map.insert("client_os".into(), NULL_FIELD.into());
        map.insert("auth_token".into(), "".into());
        Self(map)
    }

    /// Login payload. The token slot is always empty.
    pub fn login(client: &ClientInfo, account: &AccountCredentials) -> Self {
        let mut payload = Self::base(client);
        payload.insert("email", account.email.as_str());
        payload.insert("password", account.password());
        payload.insert("facebook_token", NULL_FIELD);
        payload.insert("is_modal_view", "false");
        payload.insert("apple_id", NULL_FIELD);
        payload.insert("apple_token", NULL_FIELD);
        payload
    }

    /// List-locations payload for one location set.
    pub fn list_locations(client: &ClientInfo, set: LocationSet) -> Self {
        let mut payload = Self::base(client);
        payload.insert("ordering_enabled", set.flag());
        payload
    }

    /// Product catalog payload for one location.
    pub fn list_products(client: &ClientInfo, location_id: &LocationId) -> Self {
        let mut payload = Self::base(client);
        payload.insert("location_id", location_id.to_value());
        payload.insert("refresh_cache", "False");
        payload
    }

    fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Splices a credential into the `auth_token` slot (empty if `None`).
    pub fn set_token(&mut self, credential: Option<&Credential>) {
        let token = credential.map_or("", Credential::as_str);
        self.insert("auth_token", token);
    }

    /// The current `auth_token` value.
    pub fn token(&self) -> Option<&str> {
        self.0.get("auth_token").and_then(Value::as_str)
    }

    /// Looks up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The payload as a JSON body.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// The payload with secrets masked, for logging.
    pub fn redacted(&self) -> Value {
        let mut map = self.0.clone();
        for field in SENSITIVE_FIELDS {
            if let Some(value) = map.get_mut(*field) {
                if value.as_str().is_some_and(|s| !s.is_empty()) {
                    *value = Value::from("<redacted>");
                }
            }
        }
        Value::Object(map)
    }
}

// ============================================================================
// Tests
// ============================================================================
