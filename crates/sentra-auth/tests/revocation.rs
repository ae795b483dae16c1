//! Revocation store behavior: single revocation, the per-user cascade,
//! and the fail-closed policy.

mod common;

use chrono::{Duration, Utc};
use uuid::Uuid;

use common::{failing_cache, memory_cache};
use sentra_auth::revocation::{RevocationReason, RevocationStore};

#[tokio::test]
async fn test_revoke_then_is_revoked() {
    let store = RevocationStore::new(memory_cache());
    let user_id = Uuid::new_v4();
    let tenant_id = Uuid::new_v4();

    assert!(!store.is_revoked("jti-1").await);

    store
        .revoke(
            "jti-1",
            user_id,
            tenant_id,
            Utc::now() + Duration::minutes(15),
            RevocationReason::Logout,
        )
        .await
        .unwrap();

    assert!(store.is_revoked("jti-1").await);
    assert!(!store.is_revoked("jti-2").await);

    let entry = store.describe("jti-1").await.unwrap().unwrap();
    assert_eq!(entry.user_id, user_id);
    assert_eq!(entry.reason, RevocationReason::Logout);
}

#[tokio::test]
async fn test_revoking_expired_token_is_a_noop() {
    let store = RevocationStore::new(memory_cache());

    store
        .revoke(
            "stale",
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now() - Duration::minutes(1),
            RevocationReason::Logout,
        )
        .await
        .unwrap();

    assert!(store.describe("stale").await.unwrap().is_none());
}

#[tokio::test]
async fn test_cascade_revokes_all_registered_tokens() {
    let store = RevocationStore::new(memory_cache());
    let user_id = Uuid::new_v4();
    let tenant_id = Uuid::new_v4();
    let expiry = Utc::now() + Duration::hours(1);

    for jti in ["a", "b", "c"] {
        store.register(jti, user_id, tenant_id, expiry).await.unwrap();
    }
    // One is already revoked; the cascade must not double-count it.
    store
        .revoke("a", user_id, tenant_id, expiry, RevocationReason::Logout)
        .await
        .unwrap();

    let count = store.revoke_all_for_user(user_id, tenant_id).await.unwrap();
    assert_eq!(count, 2);

    for jti in ["a", "b", "c"] {
        assert!(store.is_revoked(jti).await);
    }
    // The cascaded entries carry the Security reason; the earlier
    // revocation keeps its own.
    assert_eq!(
        store.describe("b").await.unwrap().unwrap().reason,
        RevocationReason::Security
    );
    assert_eq!(
        store.describe("a").await.unwrap().unwrap().reason,
        RevocationReason::Logout
    );
}

#[tokio::test]
async fn test_cascade_counts_only_live_registrations() {
    let store = RevocationStore::new(memory_cache());
    let user_id = Uuid::new_v4();
    let tenant_id = Uuid::new_v4();

    store
        .register("live", user_id, tenant_id, Utc::now() + Duration::hours(1))
        .await
        .unwrap();

    let count = store.revoke_all_for_user(user_id, tenant_id).await.unwrap();
    assert_eq!(count, 1);

    // A user with nothing registered cascades to zero.
    let count = store
        .revoke_all_for_user(Uuid::new_v4(), tenant_id)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_storage_outage_fails_closed() {
    let store = RevocationStore::new(failing_cache());

    // A token that was never revoked reads as revoked while the store is
    // unreachable.
    assert!(store.is_revoked("any").await);

    // Writes surface their error instead of silently dropping.
    let result = store
        .revoke(
            "any",
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now() + Duration::minutes(5),
            RevocationReason::Security,
        )
        .await;
    assert!(result.is_err());
}
