//! End-to-end sync run tests.
//!
//! Every run goes through a scripted transport and a temporary output
//! directory; the login path uses the real authenticator.

use std::sync::Arc;

use runsync_core::{Credential, LocationId, LocationSet};
use runsync_fetch::{
    AccountCredentials, Authenticator, ClientInfo, Endpoints, ScriptedTransport, Transport,
};
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::persistence::{load_json, save_json};
use crate::report::ListSource;
use crate::run::SyncRun;
use crate::snapshots::SnapshotStore;

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    transport: Arc<ScriptedTransport>,
    endpoints: Endpoints,
    dir: TempDir,
}

impl Harness {
    fn new() -> Self {
        Self {
            transport: Arc::new(ScriptedTransport::new()),
            endpoints: Endpoints::from_base("https://backend.test/api/v2"),
            dir: TempDir::new().unwrap(),
        }
    }

    fn sync_run(&self, token: Option<&str>) -> SyncRun {
        let transport: Arc<dyn Transport> = self.transport.clone();
        let authenticator = Authenticator::new(
            Arc::clone(&transport),
            &self.endpoints,
            ClientInfo::default(),
            Some(AccountCredentials::new("me@example.com", "hunter2")),
        );
        SyncRun::new(
            transport,
            Arc::new(authenticator),
            self.endpoints.clone(),
            ClientInfo::default(),
            SnapshotStore::new(self.dir.path()),
            token.map(Credential::new),
        )
    }

    fn locations(&self, entries: Value) -> &Self {
        self.transport.respond(
            &self.endpoints.list_locations,
            200,
            json!({"status": 1, "locations": entries}),
        );
        self
    }

    fn catalog(&self, name: &str, cached_at: &str, marker: u32) -> &Self {
        self.transport
            .respond(&self.endpoints.list_products, 200, catalog(name, cached_at, marker));
        self
    }

    fn login_succeeds(&self, token: &str) -> &Self {
        self.transport.respond(
            &self.endpoints.login,
            200,
            json!({"status": 1, "auth_token": token}),
        );
        self
    }

    fn product_tokens(&self) -> Vec<String> {
        self.transport
            .requests_to(&self.endpoints.list_products)
            .iter()
            .map(|r| r.token().unwrap_or_default().to_string())
            .collect()
    }

    async fn stored(&self, file_name: &str) -> Value {
        load_json(&self.dir.path().join(file_name)).await.unwrap()
    }
}

fn catalog(name: &str, cached_at: &str, marker: u32) -> Value {
    json!({
        "status": 1,
        "cached_at": cached_at,
        "location": {"name": name},
        "products": [{"id": marker}]
    })
}

fn ids(values: &[i64]) -> Vec<LocationId> {
    values.iter().copied().map(LocationId::from).collect()
}

// ============================================================================
// Full Run
// ============================================================================

#[tokio::test]
async fn test_full_run_writes_lists_and_catalogs() {
    let h = Harness::new();
    h.locations(json!([
        {"location_id": 1, "name": "Store A"},
        {"location_id": 2, "name": "Store B"}
    ]))
    .locations(json!([
        {"location_id": 2, "name": "Store B"},
        {"location_id": 3, "name": "Cafe/Bar"}
    ]));
    h.catalog("Store A", "2024-01-02T00:00:00Z", 1)
        .catalog("Store B", "2024-01-02T00:00:00Z", 2)
        .catalog("Cafe/Bar", "2024-01-02T00:00:00Z", 3);

    let report = h.sync_run(Some("tok")).run().await.unwrap();

    assert_eq!(report.location_ids, ids(&[1, 2, 3]));
    assert_eq!(report.written.len(), 3);
    assert!(report.is_clean());
    assert_eq!(report.token_refreshes, 0);

    let enabled = h.stored("locations_ordering_enabled.json").await;
    assert_eq!(enabled["locations"][1]["name"], json!("Cafe/Bar"));
    assert_eq!(h.stored("locations.json").await["locations"][0]["location_id"], json!(1));
    assert_eq!(h.stored("Store_A.json").await["products"][0]["id"], json!(1));
    assert_eq!(h.stored("Cafe_Bar.json").await["products"][0]["id"], json!(3));

    assert!(h.transport.requests_to(&h.endpoints.login).is_empty());
    assert_eq!(h.product_tokens(), vec!["tok", "tok", "tok"]);
}

#[tokio::test]
async fn test_list_requests_carry_ordering_flag() {
    let h = Harness::new();
    h.locations(json!([])).locations(json!([]));

    h.sync_run(Some("tok")).run().await.unwrap();

    let flags: Vec<Value> = h
        .transport
        .requests_to(&h.endpoints.list_locations)
        .iter()
        .map(|r| r.body["ordering_enabled"].clone())
        .collect();
    assert_eq!(flags, vec![json!("0"), json!("1")]);
    assert!(h.transport.requests_to(&h.endpoints.list_products).is_empty());
}

// ============================================================================
// Freshness
// ============================================================================

#[tokio::test]
async fn test_equal_cached_at_keeps_existing_catalog() {
    let h = Harness::new();
    save_json(
        &h.dir.path().join("Store_A.json"),
        &catalog("Store A", "2024-01-02T00:00:00Z", 1),
    )
    .await
    .unwrap();

    h.locations(json!([{"location_id": 1, "name": "Store A"}]))
        .locations(json!([]));
    h.catalog("Store A", "2024-01-02T00:00:00Z", 2);

    let report = h.sync_run(Some("tok")).run().await.unwrap();

    assert!(report.written.is_empty());
    assert_eq!(report.stale.len(), 1);
    assert_eq!(h.stored("Store_A.json").await["products"][0]["id"], json!(1));
}

#[tokio::test]
async fn test_newer_cached_at_replaces_catalog() {
    let h = Harness::new();
    save_json(
        &h.dir.path().join("Store_A.json"),
        &catalog("Store A", "2024-01-02 00:00:00", 1),
    )
    .await
    .unwrap();

    h.locations(json!([{"location_id": 1, "name": "Store A"}]))
        .locations(json!([]));
    h.catalog("Store A", "2024-01-02T00:00:01Z", 2);

    let report = h.sync_run(Some("tok")).run().await.unwrap();

    assert_eq!(report.written.len(), 1);
    assert_eq!(h.stored("Store_A.json").await["products"][0]["id"], json!(2));
}

// ============================================================================
// Token Expiry
// ============================================================================

#[tokio::test]
async fn test_expired_token_is_refreshed_once_and_request_resent() {
    let h = Harness::new();
    h.locations(json!([
        {"location_id": 1, "name": "Store A"},
        {"location_id": 2, "name": "Store B"}
    ]))
    .locations(json!([]));
    h.transport
        .respond(&h.endpoints.list_products, 200, json!({"status": 6}));
    h.login_succeeds("fresh");
    h.catalog("Store A", "2024-01-02T00:00:00Z", 1)
        .catalog("Store B", "2024-01-02T00:00:00Z", 2);

    let mut run = h.sync_run(Some("old"));
    let report = run.run().await.unwrap();

    assert_eq!(h.transport.requests_to(&h.endpoints.login).len(), 1);
    assert_eq!(h.product_tokens(), vec!["old", "fresh", "fresh"]);
    assert_eq!(report.written.len(), 2);
    assert_eq!(report.token_refreshes, 1);
    assert_eq!(run.credential(), Some(Credential::new("fresh")));
}

#[tokio::test]
async fn test_failed_refresh_aborts_the_run() {
    let h = Harness::new();
    h.transport
        .respond(&h.endpoints.list_locations, 401, json!({"status": 6}));
    h.transport
        .respond(&h.endpoints.login, 401, json!({"status": 0, "message": "bad password"}));

    let err = h.sync_run(Some("old")).run().await.unwrap_err();

    assert!(err.is_authentication());
    assert_eq!(h.transport.requests_to(&h.endpoints.list_locations).len(), 1);
    assert!(h.transport.requests_to(&h.endpoints.list_products).is_empty());
}

#[tokio::test]
async fn test_missing_token_logs_in_first() {
    let h = Harness::new();
    h.login_succeeds("fresh");
    h.locations(json!([])).locations(json!([]));

    let report = h.sync_run(None).run().await.unwrap();

    let requests = h.transport.requests();
    assert_eq!(requests[0].url, h.endpoints.login);
    assert!(
        requests[1..]
            .iter()
            .all(|r| r.token() == Some("fresh"))
    );
    assert_eq!(report.token_refreshes, 1);
}

#[tokio::test]
async fn test_missing_token_and_failed_login_aborts() {
    let h = Harness::new();
    h.transport
        .respond(&h.endpoints.login, 200, json!({"status": 0}));

    let err = h.sync_run(None).run().await.unwrap_err();

    assert!(err.is_authentication());
    assert_eq!(h.transport.requests().len(), 1);
}

// ============================================================================
// Per-Item Failures
// ============================================================================

#[tokio::test]
async fn test_failing_location_does_not_stop_the_others() {
    let h = Harness::new();
    h.locations(json!([
        {"location_id": 41, "name": "Store A"},
        {"location_id": 42, "name": "Store B"},
        {"location_id": 43, "name": "Store C"}
    ]))
    .locations(json!([]));
    h.catalog("Store A", "2024-01-02T00:00:00Z", 41);
    h.transport
        .respond(&h.endpoints.list_products, 500, json!({"status": 0}));
    h.catalog("Store C", "2024-01-02T00:00:00Z", 43);

    let report = h.sync_run(Some("tok")).run().await.unwrap();

    assert_eq!(report.written.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].item, "location 42");
    assert!(h.transport.requests_to(&h.endpoints.login).is_empty());
    assert!(h.dir.path().join("Store_C.json").exists());
}

#[tokio::test]
async fn test_catalog_without_location_is_skipped() {
    let h = Harness::new();
    h.locations(json!([{"location_id": 5}])).locations(json!([]));
    h.transport.respond(
        &h.endpoints.list_products,
        200,
        json!({"status": 1, "cached_at": "2024-01-02T00:00:00Z", "location": {}}),
    );

    let report = h.sync_run(Some("tok")).run().await.unwrap();

    assert!(report.written.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert!(!h.dir.path().join("location_5.json").exists());
}

#[tokio::test]
async fn test_catalog_without_name_uses_location_id() {
    let h = Harness::new();
    h.locations(json!([{"location_id": 5}])).locations(json!([]));
    h.transport.respond(
        &h.endpoints.list_products,
        200,
        json!({"status": 1, "cached_at": "2024-01-02T00:00:00Z", "location": {"id": 5}}),
    );

    let report = h.sync_run(Some("tok")).run().await.unwrap();

    assert_eq!(report.written.len(), 1);
    assert!(h.dir.path().join("location_5.json").exists());
}

// ============================================================================
// Location List Fallback
// ============================================================================

#[tokio::test]
async fn test_failed_list_falls_back_to_persisted_copy() {
    let h = Harness::new();
    let persisted = json!({"locations": [{"location_id": 7, "name": "Store G"}]});
    SnapshotStore::new(h.dir.path())
        .save_location_list(LocationSet::OrderingEnabled, &persisted)
        .await
        .unwrap();

    h.locations(json!([{"location_id": 1, "name": "Store A"}]));
    h.transport
        .respond(&h.endpoints.list_locations, 500, Value::Null);
    h.catalog("Store A", "2024-01-02T00:00:00Z", 1)
        .catalog("Store G", "2024-01-02T00:00:00Z", 7);

    let report = h.sync_run(Some("tok")).run().await.unwrap();

    assert_eq!(report.location_ids, ids(&[1, 7]));
    let sources: Vec<ListSource> = report.location_lists.iter().map(|l| l.source).collect();
    assert_eq!(sources, vec![ListSource::Fetched, ListSource::Fallback]);
    assert_eq!(h.stored("locations_ordering_enabled.json").await, persisted);
    assert_eq!(report.written.len(), 2);
    assert_eq!(report.failures.len(), 1);
}

#[tokio::test]
async fn test_non_object_list_body_keeps_persisted_copy() {
    let h = Harness::new();
    let persisted = json!({"locations": [{"location_id": 7, "name": "Store G"}]});
    SnapshotStore::new(h.dir.path())
        .save_location_list(LocationSet::OrderingEnabled, &persisted)
        .await
        .unwrap();

    h.locations(json!([]));
    h.transport
        .respond(&h.endpoints.list_locations, 200, Value::Null);
    h.catalog("Store G", "2024-01-02T00:00:00Z", 7);

    let report = h.sync_run(Some("tok")).run().await.unwrap();

    assert_eq!(h.stored("locations_ordering_enabled.json").await, persisted);
    assert_eq!(report.location_ids, ids(&[7]));
    assert_eq!(report.location_lists[1].source, ListSource::Fallback);
    assert_eq!(report.failures[0].item, "ordering-enabled location list");
}

#[tokio::test]
async fn test_failed_list_without_persisted_copy_contributes_nothing() {
    let h = Harness::new();
    h.transport.fail(&h.endpoints.list_locations, "connection reset");
    h.locations(json!([{"location_id": 1, "name": "Store A"}]));
    h.catalog("Store A", "2024-01-02T00:00:00Z", 1);

    let report = h.sync_run(Some("tok")).run().await.unwrap();

    assert_eq!(report.location_ids, ids(&[1]));
    assert_eq!(report.location_lists[0].source, ListSource::Unavailable);
    assert!(!h.dir.path().join("locations.json").exists());
}

// ============================================================================
// Partial Runs
// ============================================================================

#[tokio::test]
async fn test_products_only_skips_location_lists() {
    let h = Harness::new();
    h.catalog("Store E", "2024-01-02T00:00:00Z", 5);

    let report = h
        .sync_run(Some("tok"))
        .products(&ids(&[5]))
        .await
        .unwrap();

    assert_eq!(report.written.len(), 1);
    assert!(h.transport.requests_to(&h.endpoints.list_locations).is_empty());
    assert_eq!(h.transport.requests_to(&h.endpoints.list_products)[0].body["location_id"], json!(5));
}

#[tokio::test]
async fn test_login_always_logs_in() {
    let h = Harness::new();
    h.login_succeeds("fresh");

    let mut run = h.sync_run(Some("old"));
    run.login().await.unwrap();

    assert_eq!(run.credential(), Some(Credential::new("fresh")));
    assert_eq!(h.transport.requests().len(), 1);
}
