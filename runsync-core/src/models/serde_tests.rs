//! Serde behaviour of the location models against backend-shaped JSON.

use serde_json::json;

use super::{Location, LocationId};

#[test]
fn test_location_id_accepts_number_and_string() {
    let number: LocationId = serde_json::from_value(json!(42)).unwrap();
    let text: LocationId = serde_json::from_value(json!("42")).unwrap();

    assert_eq!(number, LocationId::Number(42));
    assert_eq!(text, LocationId::Text("42".to_string()));
    assert_ne!(number, text);
}

#[test]
fn test_location_id_serializes_untagged() {
    assert_eq!(serde_json::to_value(LocationId::Number(5)).unwrap(), json!(5));
    assert_eq!(
        serde_json::to_value(LocationId::Text("x".to_string())).unwrap(),
        json!("x")
    );
}

#[test]
fn test_location_ignores_unknown_fields() {
    let location: Location = serde_json::from_value(json!({
        "location_id": 7,
        "name": "Store A",
        "address": "1 Main St",
        "ordering_enabled": "1",
        "lat": -34.9
    }))
    .unwrap();

    assert_eq!(location.location_id, LocationId::Number(7));
    assert_eq!(location.name, "Store A");
    assert!(!location.ordering_enabled);
}

#[test]
fn test_location_name_defaults_to_empty() {
    let location: Location = serde_json::from_value(json!({"location_id": 7})).unwrap();
    assert!(location.name.is_empty());
}
