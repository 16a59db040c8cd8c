//! Product catalog types.
//!
//! Catalog responses are persisted verbatim, so only the parts needed to
//! decide *where* and *whether* to write are modelled here:
//! - [`CatalogHeader`] - `location` and `cached_at` of a response
//! - [`CachedAt`] - Freshness timestamp
//! - [`catalog_file_name`] - Output filename for a location

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use std::fmt;

use super::location::LocationId;

/// Naive layouts the backend has been seen to use, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Characters replaced in filename stems.
const HOSTILE_CHARS: &[char] = &[' ', '/', '\\', ':', '*', '?', '"', '<', '>', '|'];

// ============================================================================
// Cached At
// ============================================================================

/// Server-supplied catalog freshness timestamp.
///
/// Compared as instants when both sides parse, otherwise as raw strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAt {
    raw: String,
    instant: Option<DateTime<Utc>>,
}

impl CachedAt {
    /// Parses a timestamp. Never fails: unknown layouts keep only the raw text.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let instant = parse_instant(raw.trim());
        Self { raw, instant }
    }

    /// The timestamp as received.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed instant, if the layout was recognised.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }

    /// Returns true if `self` is strictly later than `other`.
    pub fn is_newer_than(&self, other: &CachedAt) -> bool {
        match (self.instant, other.instant) {
            (Some(ours), Some(theirs)) => ours > theirs,
            _ => self.raw > other.raw,
        }
    }
}

impl fmt::Display for CachedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

// ============================================================================
// Catalog Header
// ============================================================================

/// The routing fields of a product catalog response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogHeader {
    /// Whether the response carries a non-empty `location` object.
    pub has_location: bool,
    /// `location.name`, if present.
    pub location_name: Option<String>,
    /// `cached_at`, if present and non-empty.
    pub cached_at: Option<CachedAt>,
}

impl CatalogHeader {
    /// Extracts the header from a catalog response or persisted document.
    pub fn from_value(body: &Value) -> Self {
        let location = body
            .get("location")
            .and_then(Value::as_object)
            .filter(|map| !map.is_empty());

        let location_name = location
            .and_then(|map| map.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let cached_at = match body.get("cached_at") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(CachedAt::parse(s.as_str())),
            Some(Value::Number(n)) => Some(CachedAt::parse(n.to_string())),
            _ => None,
        };

        Self {
            has_location: location.is_some(),
            location_name,
            cached_at,
        }
    }
}

// ============================================================================
// Filenames
// ============================================================================

/// Makes a location name safe to use as a filename stem.
///
/// Spaces and path-hostile characters become `_`; control characters too.
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_control() || HOSTILE_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Output filename for a location's catalog.
///
/// Falls back to `location_<id>.json` when the name is missing or blank.
pub fn catalog_file_name(name: Option<&str>, id: &LocationId) -> String {
    let stem = name
        .filter(|n| !n.trim().is_empty())
        .map_or_else(|| format!("location_{id}"), sanitize_file_stem);
    format!("{stem}.json")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strictly_newer() {
        let old = CachedAt::parse("2024-01-01T00:00:00Z");
        let new = CachedAt::parse("2024-01-02T00:00:00Z");

        assert!(new.is_newer_than(&old));
        assert!(!old.is_newer_than(&new));
    }

    #[test]
    fn test_equal_is_not_newer() {
        let a = CachedAt::parse("2024-01-02T00:00:00Z");
        let b = CachedAt::parse("2024-01-02T00:00:00Z");
        assert!(!a.is_newer_than(&b));
    }

    #[test]
    fn test_compares_instants_across_offsets() {
        // The offset form sorts after the UTC form as text but is the same instant.
        let utc = CachedAt::parse("2024-01-02T00:00:00Z");
        let offset = CachedAt::parse("2024-01-02T10:00:00+10:00");

        assert!(!offset.is_newer_than(&utc));
        assert!(!utc.is_newer_than(&offset));
    }

    #[test]
    fn test_fractional_seconds_compare_by_value() {
        let whole = CachedAt::parse("2024-01-02 00:00:00");
        let fraction = CachedAt::parse("2024-01-02 00:00:00.5");

        assert!(fraction.is_newer_than(&whole));
        assert!(whole.instant().is_some());
    }

    #[test]
    fn test_unparseable_falls_back_to_text() {
        let a = CachedAt::parse("build-7");
        let b = CachedAt::parse("build-8");

        assert!(a.instant().is_none());
        assert!(b.is_newer_than(&a));
    }

    #[test]
    fn test_header_extraction() {
        let body = json!({
            "status": 1,
            "cached_at": "2024-01-02T00:00:00Z",
            "location": {"name": "Store A", "location_id": 42},
            "products": []
        });

        let header = CatalogHeader::from_value(&body);

        assert!(header.has_location);
        assert_eq!(header.location_name.as_deref(), Some("Store A"));
        assert_eq!(
            header.cached_at.map(|c| c.as_str().to_string()),
            Some("2024-01-02T00:00:00Z".to_string())
        );
    }

    #[test]
    fn test_header_empty_location_is_missing() {
        let header = CatalogHeader::from_value(&json!({"location": {}, "cached_at": ""}));
        assert!(!header.has_location);
        assert!(header.cached_at.is_none());
    }

    #[test]
    fn test_file_name_from_location_name() {
        let id = LocationId::Number(42);
        assert_eq!(catalog_file_name(Some("Store A"), &id), "Store_A.json");
        assert_eq!(
            catalog_file_name(Some("North/South: Depot"), &id),
            "North_South__Depot.json"
        );
    }

    #[test]
    fn test_file_name_fallback() {
        let id = LocationId::Number(42);
        assert_eq!(catalog_file_name(None, &id), "location_42.json");
        assert_eq!(catalog_file_name(Some("   "), &id), "location_42.json");
    }

    #[test]
    fn test_sanitize_keeps_unicode() {
        assert_eq!(sanitize_file_stem("Café Nord"), "Café_Nord");
    }
}
