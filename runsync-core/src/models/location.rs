//! Location types.
//!
//! - [`LocationId`] - Backend location id
//! - [`Location`] - A single store location
//! - [`LocationSet`] - The ordering-disabled / ordering-enabled lists
//! - [`LocationList`] - Parsed view of a list-locations response

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// Location Id
// ============================================================================

/// Backend location id.
///
/// The backend is not consistent about whether ids are numbers or strings,
/// so both are kept as received and echoed back unchanged in product
/// requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationId {
    /// Numeric id.
    Number(i64),
    /// Textual id.
    Text(String),
}

impl LocationId {
    /// Parses a command-line style id: digits become [`LocationId::Number`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Text(trimmed.to_string()), Self::Number)
    }

    /// Converts the id into a JSON value for request payloads.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::from(*n),
            Self::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for LocationId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for LocationId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

// ============================================================================
// Location Set
// ============================================================================

/// Which location list a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationSet {
    /// Locations with online ordering disabled (`ordering_enabled = "0"`).
    OrderingDisabled,
    /// Locations accepting online orders (`ordering_enabled = "1"`).
    OrderingEnabled,
}

impl LocationSet {
    /// Both sets, in request order.
    pub const ALL: [LocationSet; 2] = [LocationSet::OrderingDisabled, LocationSet::OrderingEnabled];

    /// The `ordering_enabled` request flag.
    pub fn flag(self) -> &'static str {
        match self {
            Self::OrderingDisabled => "0",
            Self::OrderingEnabled => "1",
        }
    }

    /// The file this set's response is persisted to.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::OrderingDisabled => "locations.json",
            Self::OrderingEnabled => "locations_ordering_enabled.json",
        }
    }

    /// Returns true for the ordering-enabled set.
    pub fn is_ordering_enabled(self) -> bool {
        self == Self::OrderingEnabled
    }
}

impl fmt::Display for LocationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderingDisabled => f.write_str("ordering-disabled"),
            Self::OrderingEnabled => f.write_str("ordering-enabled"),
        }
    }
}

// ============================================================================
// Location
// ============================================================================

/// A store location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Backend id.
    pub location_id: LocationId,
    /// Display name. Empty when missing, null, or not a string.
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    /// Taken from the list the location was returned in, not the payload.
    #[serde(skip)]
    pub ordering_enabled: bool,
}

/// Only the id decides whether an entry is usable.
fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string).unwrap_or_default())
}

// ============================================================================
// Location List
// ============================================================================

/// Parsed view of a list-locations response.
///
/// Parsing is lenient: entries without a usable `location_id` are counted in
/// [`LocationList::malformed`] instead of failing the whole list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationList {
    /// Locations in response order.
    pub locations: Vec<Location>,
    /// Number of entries that could not be parsed.
    pub malformed: usize,
}

impl LocationList {
    /// Extracts locations from a response body.
    ///
    /// A body without a `locations` array yields an empty list.
    pub fn from_value(body: &Value, set: LocationSet) -> Self {
        let Some(entries) = body.get("locations").and_then(Value::as_array) else {
            return Self::default();
        };

        let mut list = Self::default();
        for entry in entries {
            match serde_json::from_value::<Location>(entry.clone()) {
                Ok(mut location) => {
                    location.ordering_enabled = set.is_ordering_enabled();
                    list.locations.push(location);
                }
                Err(_) => list.malformed += 1,
            }
        }
        list
    }

    /// Ids of all locations, in response order.
    pub fn ids(&self) -> impl Iterator<Item = &LocationId> {
        self.locations.iter().map(|l| &l.location_id)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_cli_ids() {
        assert_eq!(LocationId::parse("42"), LocationId::Number(42));
        assert_eq!(LocationId::parse(" 42 "), LocationId::Number(42));
        assert_eq!(LocationId::parse("abc-1"), LocationId::Text("abc-1".to_string()));
    }

    #[test]
    fn test_id_echoes_original_json_type() {
        assert_eq!(LocationId::Number(7).to_value(), json!(7));
        assert_eq!(LocationId::from("7").to_value(), json!("7"));
    }

    #[test]
    fn test_location_set_files() {
        assert_eq!(LocationSet::OrderingDisabled.file_name(), "locations.json");
        assert_eq!(
            LocationSet::OrderingEnabled.file_name(),
            "locations_ordering_enabled.json"
        );
        assert_eq!(LocationSet::OrderingDisabled.flag(), "0");
        assert_eq!(LocationSet::OrderingEnabled.flag(), "1");
    }

    #[test]
    fn test_list_marks_ordering_flag_from_set() {
        let body = json!({
            "status": 1,
            "locations": [
                {"location_id": 1, "name": "Store A"},
                {"location_id": "2", "name": "Store B", "ordering_enabled": "0"}
            ]
        });

        let list = LocationList::from_value(&body, LocationSet::OrderingEnabled);

        assert_eq!(list.locations.len(), 2);
        assert!(list.locations.iter().all(|l| l.ordering_enabled));
        assert_eq!(list.locations[1].location_id, LocationId::Text("2".to_string()));
    }

    #[test]
    fn test_list_skips_malformed_entries() {
        let body = json!({
            "locations": [
                {"location_id": 1, "name": "Store A"},
                {"name": "No Id"},
                "garbage"
            ]
        });

        let list = LocationList::from_value(&body, LocationSet::OrderingDisabled);

        assert_eq!(list.locations.len(), 1);
        assert_eq!(list.malformed, 2);
    }

    #[test]
    fn test_unusable_name_keeps_the_location() {
        let body = json!({
            "locations": [
                {"location_id": 1, "name": "Store A"},
                {"location_id": 2, "name": null},
                {"location_id": 3, "name": {"en": "Store C"}}
            ]
        });

        let list = LocationList::from_value(&body, LocationSet::OrderingDisabled);

        assert_eq!(list.malformed, 0);
        assert_eq!(
            list.ids().cloned().collect::<Vec<_>>(),
            vec![LocationId::from(1), LocationId::from(2), LocationId::from(3)]
        );
        assert_eq!(list.locations[1].name, "");
        assert_eq!(list.locations[2].name, "");
    }

    #[test]
    fn test_list_without_locations_key_is_empty() {
        let list = LocationList::from_value(&json!({"status": 1}), LocationSet::OrderingDisabled);
        assert!(list.locations.is_empty());
        assert_eq!(list.malformed, 0);
    }
}
