//! End-to-end login behavior: happy path, credential failures, lockout
//! progression, and downstream-failure masking.

mod common;

use common::{TEST_PASSWORD, TestEnv};
use sentra_core::error::ErrorKind;
use sentra_entity::repository::UserRepository;
use sentra_entity::user::UserStatus;

#[tokio::test]
async fn test_login_issues_tokens_and_session() {
    let env = TestEnv::new();
    let result = env
        .manager
        .login(
            "user@example.com",
            TEST_PASSWORD,
            env.tenant_id,
            "10.0.0.1",
            Some("integration-test"),
        )
        .await
        .unwrap();

    // The access token decodes back to the authenticated user.
    let claims = env.decoder.verify_access(&result.tokens.access_token).unwrap();
    assert_eq!(claims.sub, env.user.id);
    assert_eq!(claims.org_id, env.tenant_id);

    // The session is persisted, active, and bound to the pair.
    let stored = env.sessions.all();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].is_active);
    assert_eq!(stored[0].user_id, env.user.id);
    assert_eq!(stored[0].ip_address, "10.0.0.1");

    // Login bookkeeping was persisted.
    let saved = env.users.get(env.user.id).unwrap();
    assert_eq!(saved.failed_login_attempts, 0);
    assert!(saved.last_login_at.is_some());
    assert!(!result.mfa_required);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_are_indistinguishable() {
    let env = TestEnv::new();

    let wrong_password = env
        .manager
        .login("user@example.com", "wrong", env.tenant_id, "10.0.0.1", None)
        .await
        .unwrap_err();
    let unknown_email = env
        .manager
        .login("ghost@example.com", TEST_PASSWORD, env.tenant_id, "10.0.0.2", None)
        .await
        .unwrap_err();

    assert_eq!(wrong_password.kind, ErrorKind::InvalidCredentials);
    assert_eq!(unknown_email.kind, ErrorKind::InvalidCredentials);
    assert_eq!(wrong_password.message, unknown_email.message);
}

#[tokio::test]
async fn test_wrong_tenant_does_not_find_user() {
    let env = TestEnv::new();
    let err = env
        .manager
        .login(
            "user@example.com",
            TEST_PASSWORD,
            uuid::Uuid::new_v4(),
            "10.0.0.1",
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
}

#[tokio::test]
async fn test_inactive_account_rejected_before_password_check() {
    let env = TestEnv::new();
    let mut user = env.user.clone();
    user.status = UserStatus::Inactive;
    env.users.save(&user).await.unwrap();

    let err = env
        .manager
        .login("user@example.com", TEST_PASSWORD, env.tenant_id, "10.0.0.1", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccountNotActive);
}

#[tokio::test]
async fn test_lockout_progression() {
    // Threshold is 3 in the test config.
    let env = TestEnv::new();

    for attempt in 1..=2 {
        let err = env
            .manager
            .login("user@example.com", "wrong", env.tenant_id, "10.0.0.1", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredentials);

        let saved = env.users.get(env.user.id).unwrap();
        assert_eq!(saved.failed_login_attempts, attempt);
        assert_eq!(saved.status, UserStatus::Active);
    }

    // Third failure trips the lock.
    env.manager
        .login("user@example.com", "wrong", env.tenant_id, "10.0.0.1", None)
        .await
        .unwrap_err();
    let saved = env.users.get(env.user.id).unwrap();
    assert_eq!(saved.status, UserStatus::Locked);
    assert!(saved.locked_until.is_some());

    // Even the correct password is now refused, with the status error.
    let err = env
        .manager
        .login("user@example.com", TEST_PASSWORD, env.tenant_id, "10.0.0.1", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccountNotActive);
}

#[tokio::test]
async fn test_successful_login_resets_failure_counter() {
    let env = TestEnv::new();

    env.manager
        .login("user@example.com", "wrong", env.tenant_id, "10.0.0.1", None)
        .await
        .unwrap_err();
    assert_eq!(env.users.get(env.user.id).unwrap().failed_login_attempts, 1);

    env.manager
        .login("user@example.com", TEST_PASSWORD, env.tenant_id, "10.0.0.1", None)
        .await
        .unwrap();
    assert_eq!(env.users.get(env.user.id).unwrap().failed_login_attempts, 0);
}

#[tokio::test]
async fn test_session_persistence_failure_masks_cause_and_revokes_pair() {
    let env = TestEnv::with_failing_sessions();

    let err = env
        .manager
        .login("user@example.com", TEST_PASSWORD, env.tenant_id, "10.0.0.1", None)
        .await
        .unwrap_err();

    // Internal failure surfaces as the generic kind with no detail.
    assert_eq!(err.kind, ErrorKind::AuthenticationFailed);
    assert!(!err.message.to_lowercase().contains("session"));
}

#[tokio::test]
async fn test_session_lookup_and_activity_stamping() {
    let env = TestEnv::new();
    let result = env
        .manager
        .login("user@example.com", TEST_PASSWORD, env.tenant_id, "10.0.0.1", None)
        .await
        .unwrap();

    // Both tokens resolve to the same live session.
    let mut session = env
        .store
        .find_by_token(&result.tokens.access_token, env.tenant_id)
        .await
        .unwrap()
        .unwrap();
    let via_refresh = env
        .store
        .find_by_token(&result.tokens.refresh_token, env.tenant_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.id, via_refresh.id);

    let before = session.last_activity;
    env.store.touch(&mut session).await.unwrap();
    assert!(session.last_activity >= before);
    assert_eq!(env.sessions.all()[0].last_activity, session.last_activity);
}

#[tokio::test]
async fn test_mfa_flag_propagates_from_user_record() {
    let env = TestEnv::new();
    let mut user = env.user.clone();
    user.require_mfa = true;
    env.users.save(&user).await.unwrap();

    let result = env
        .manager
        .login("user@example.com", TEST_PASSWORD, env.tenant_id, "10.0.0.1", None)
        .await
        .unwrap();
    assert!(result.mfa_required);
}
