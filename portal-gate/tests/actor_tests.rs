//! GateActor integration tests: sequential processing through the handle

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use portal_gate::cache::STUDENT_ID_KEY;
use portal_gate::{
    AccessGate, GateActor, GateConfig, GateResult, Identity, LocalCache, MemoryCache, MemoryStore,
    RecordingNavigator, Role, SettlingIdentityProvider, StaticIdentityProvider,
};

fn seeded_store(config: &GateConfig) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.insert(&config.settings_path(), "adminAuth", json!({ "email": "a@x.com" }));
    store.insert(
        &config.staff_path(),
        "t1",
        json!({ "email": "b@x.com", "isActive": true }),
    );
    store.insert(&config.students_path(), "S1", json!({ "name": "Asha" }));
    store
}

#[tokio::test]
async fn test_handle_round_trip() {
    let config = GateConfig::default();
    let store = seeded_store(&config);
    let navigator = Arc::new(RecordingNavigator::new());
    let gate = AccessGate::new(
        config,
        Arc::new(StaticIdentityProvider::signed_in(Identity::new("u2", "b@x.com"))),
        store,
        Arc::new(MemoryCache::new()),
        navigator.clone(),
    );
    let handle = GateActor::spawn(gate);

    let identity = handle.resolve_identity().await.unwrap();
    assert_eq!(identity.map(|i| i.uid), Some("u2".to_string()));

    let staff = handle.check_staff_or_admin().await.unwrap();
    assert_eq!(staff.role(), Role::Staff);

    let admin = handle.check_admin().await.unwrap();
    assert!(admin.is_denied());
    assert_eq!(navigator.redirect_count(), 1);
}

#[tokio::test]
async fn test_student_through_handle() {
    let config = GateConfig::default();
    let cache = Arc::new(MemoryCache::new());
    cache.set(STUDENT_ID_KEY, "S1").unwrap();

    let gate = AccessGate::new(
        config.clone(),
        Arc::new(StaticIdentityProvider::signed_in(Identity::anonymous("anon"))),
        seeded_store(&config),
        cache,
        Arc::new(RecordingNavigator::new()),
    );
    let handle = GateActor::spawn(gate);

    let result = handle.check_student().await.unwrap();
    assert_eq!(result, GateResult::Student { id: "S1".into() });
}

#[tokio::test]
async fn test_checks_run_one_at_a_time() {
    let config = GateConfig::default();
    let store = seeded_store(&config);
    let provider = Arc::new(SettlingIdentityProvider::new());
    let gate = AccessGate::new(
        config,
        provider.clone(),
        store.clone(),
        Arc::new(MemoryCache::new()),
        Arc::new(RecordingNavigator::new()),
    );
    let handle = GateActor::spawn(gate);

    let first = tokio::spawn({
        let handle = handle.clone();
        async move { handle.check_admin().await }
    });
    let second = tokio::spawn({
        let handle = handle.clone();
        async move { handle.check_staff_or_admin().await }
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    // the second check is queued behind the first, not subscribed yet
    assert_eq!(provider.listener_count(), 1);
    assert_eq!(store.request_count(), 0);

    provider.settle(Some(Identity::new("u1", "a@x.com")));

    assert_eq!(first.await.unwrap().unwrap().role(), Role::Admin);
    assert_eq!(second.await.unwrap().unwrap().role(), Role::Admin);
}
