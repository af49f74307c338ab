//! AccessGate wired to the Firebase REST backends

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portal_gate::cache::STUDENT_ID_KEY;
use portal_gate::{
    AccessGate, GateConfig, GateResult, LocalCache, MemoryCache, RecordingNavigator, Role,
};
use portal_sources::{FirebaseConfig, FirestoreStore, IdentityToolkitProvider};

const DOCS: &str = "/v1/projects/demo/databases/(default)/documents";

async fn mount_lookup(server: &MockServer, user: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/v1/accounts:lookup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "users": [user] })))
        .mount(server)
        .await;
}

async fn mount_admin(server: &MockServer, email: &str) {
    Mock::given(method("GET"))
        .and(path(format!("{DOCS}/institutions/T1/settings/adminAuth")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo/databases/(default)/documents/institutions/T1/settings/adminAuth",
            "fields": { "email": { "stringValue": email } }
        })))
        .mount(server)
        .await;
}

fn gate(server: &MockServer, cache: Arc<MemoryCache>, navigator: Arc<RecordingNavigator>) -> AccessGate {
    let firebase = FirebaseConfig::new("demo")
        .with_api_key("test-key")
        .with_id_token("id-token-1")
        .with_endpoint(server.uri());

    AccessGate::new(
        GateConfig::new("institutions/T1"),
        Arc::new(IdentityToolkitProvider::new(firebase.clone()).unwrap()),
        Arc::new(FirestoreStore::new(firebase).unwrap()),
        cache,
        navigator,
    )
}

#[tokio::test]
async fn test_staff_gate_over_rest() {
    let server = MockServer::start().await;
    mount_lookup(
        &server,
        json!({ "localId": "u2", "email": "b@x.com", "providerUserInfo": [{ "providerId": "password" }] }),
    )
    .await;
    mount_admin(&server, "a@x.com").await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCS}/institutions/T1:runQuery")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "document": {
                "name": "projects/demo/databases/(default)/documents/institutions/T1/staff/t1",
                "fields": {
                    "email": { "stringValue": "b@x.com" },
                    "isActive": { "booleanValue": true },
                    "name": { "stringValue": "Bina" }
                }
            }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let navigator = Arc::new(RecordingNavigator::new());
    let gate = gate(&server, Arc::new(MemoryCache::new()), navigator.clone());

    match gate.check_staff_or_admin().await {
        GateResult::Staff { staff, .. } => assert_eq!(staff.display_name(), Some("Bina")),
        other => panic!("expected staff, got {other:?}"),
    }
    assert_eq!(navigator.redirect_count(), 0);
}

#[tokio::test]
async fn test_admin_gate_over_rest() {
    let server = MockServer::start().await;
    mount_lookup(
        &server,
        json!({ "localId": "u1", "email": "a@x.com", "providerUserInfo": [{ "providerId": "password" }] }),
    )
    .await;
    mount_admin(&server, "a@x.com").await;

    let gate = gate(&server, Arc::new(MemoryCache::new()), Arc::new(RecordingNavigator::new()));
    assert_eq!(gate.check_admin().await.role(), Role::Admin);
}

#[tokio::test]
async fn test_stale_student_over_rest() {
    let server = MockServer::start().await;
    mount_lookup(&server, json!({ "localId": "anon-1" })).await;
    Mock::given(method("GET"))
        .and(path(format!("{DOCS}/institutions/T1/students/S123")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(MemoryCache::new());
    cache.set(STUDENT_ID_KEY, "S123").unwrap();
    let navigator = Arc::new(RecordingNavigator::new());
    let gate = gate(&server, cache.clone(), navigator.clone());

    assert!(gate.check_student().await.is_denied());
    assert!(cache.get(STUDENT_ID_KEY).is_none());
    assert_eq!(navigator.redirects(), vec!["index.html".to_string()]);
}

#[tokio::test]
async fn test_backend_outage_denies() {
    let server = MockServer::start().await;
    mount_lookup(
        &server,
        json!({ "localId": "u1", "email": "a@x.com", "providerUserInfo": [{ "providerId": "password" }] }),
    )
    .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCS}/institutions/T1:runQuery")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let navigator = Arc::new(RecordingNavigator::new());
    let gate = gate(&server, Arc::new(MemoryCache::new()), navigator.clone());

    assert!(gate.check_staff_or_admin().await.is_denied());
    assert_eq!(navigator.redirect_count(), 1);
}
