// SPDX-License-Identifier: MIT

//! Identity resolution tests: lookup vs. create, import triggering,
//! and session serialize/deserialize.

mod common;

use common::{running_item, test_user, wait_until, MemoryStore, StubActivityApi};
use fitspector::error::AppError;
use fitspector::services::runkeeper::RunKeeperProfile;
use fitspector::services::{IdentityResolver, WorkoutImporter};
use std::sync::Arc;
use std::time::Duration;

const USER: &str = "RKU42";
const TOKEN: &str = "token";

fn resolver(store: &Arc<MemoryStore>, api: &Arc<StubActivityApi>) -> IdentityResolver {
    let importer = WorkoutImporter::new(store.clone(), api.clone());
    IdentityResolver::new(store.clone(), api.clone(), importer)
}

fn stub_profile() -> RunKeeperProfile {
    RunKeeperProfile {
        name: Some("Jane Runner".to_string()),
        athlete_type: Some("Runner".to_string()),
        ..RunKeeperProfile::default()
    }
}

#[tokio::test]
async fn test_existing_user_resolves_without_profile_fetch() {
    let store = Arc::new(MemoryStore::new());
    store.insert_user(test_user(USER));
    let api = Arc::new(StubActivityApi::with_items(vec![running_item(1)]));

    let user = resolver(&store, &api)
        .resolve(USER, Some(TOKEN))
        .await
        .unwrap();

    assert_eq!(user.id, USER);
    assert_eq!(api.profile_calls(), 0);

    // The login returned immediately; the import runs in the background.
    assert!(wait_until(|| store.workout_count(USER) == 1).await);
}

#[tokio::test]
async fn test_first_login_creates_user_then_imports() {
    let store = Arc::new(MemoryStore::new());
    let api = Arc::new(StubActivityApi {
        items: vec![running_item(1), running_item(2)],
        profile: Some(stub_profile()),
        ..StubActivityApi::default()
    });

    let user = resolver(&store, &api)
        .resolve(USER, Some(TOKEN))
        .await
        .unwrap();

    assert_eq!(user.id, USER);
    assert_eq!(user.name, "Jane Runner");
    assert_eq!(store.user_count(), 1);
    assert!(wait_until(|| store.workout_count(USER) == 2).await);
}

#[tokio::test]
async fn test_user_created_exactly_once_across_logins() {
    let store = Arc::new(MemoryStore::new());
    let api = Arc::new(StubActivityApi::with_profile(stub_profile()));
    let resolver = resolver(&store, &api);

    resolver.resolve(USER, Some(TOKEN)).await.unwrap();
    resolver.resolve(USER, Some(TOKEN)).await.unwrap();

    assert_eq!(store.user_count(), 1);
    assert_eq!(api.profile_calls(), 1);
}

#[tokio::test]
async fn test_empty_profile_fails_with_missing_profile() {
    let store = Arc::new(MemoryStore::new());
    // Stub returns Ok(None): request succeeded, no usable data.
    let api = Arc::new(StubActivityApi::default());

    let err = resolver(&store, &api)
        .resolve(USER, Some(TOKEN))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MissingProfile));
    assert_eq!(store.user_count(), 0);

    // Give any stray background task time to run; nothing should be imported.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(api.feed_calls(), 0);
}

#[tokio::test]
async fn test_failing_profile_fetch_creates_nothing() {
    let store = Arc::new(MemoryStore::new());
    let api = Arc::new(StubActivityApi::failing_profile());

    let err = resolver(&store, &api)
        .resolve(USER, Some(TOKEN))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Remote(_)));
    assert_eq!(store.user_count(), 0);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(api.feed_calls(), 0);
}

#[tokio::test]
async fn test_deserialize_rejects_foreign_identifier() {
    let store = Arc::new(MemoryStore::new());
    let api = Arc::new(StubActivityApi::default());

    let err = resolver(&store, &api)
        .deserialize_user("STR12345")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UnknownUser(_)));
}

#[tokio::test]
async fn test_deserialize_restores_user_without_import() {
    let store = Arc::new(MemoryStore::new());
    store.insert_user(test_user(USER));
    let api = Arc::new(StubActivityApi::with_items(vec![running_item(1)]));

    let user = resolver(&store, &api).deserialize_user(USER).await.unwrap();
    assert_eq!(user.id, USER);

    // No token on deserialization, so no feed fetch.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(api.feed_calls(), 0);
}

#[tokio::test]
async fn test_deserialize_of_deleted_user_fails() {
    let store = Arc::new(MemoryStore::new());
    let api = Arc::new(StubActivityApi::default());

    let err = resolver(&store, &api).deserialize_user(USER).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_serialize_returns_stable_id() {
    let store = Arc::new(MemoryStore::new());
    let api = Arc::new(StubActivityApi::default());

    let id = resolver(&store, &api).serialize_user(&test_user(USER));
    assert_eq!(id, USER);
}
