//! Tests for consuming a recovery token to set a new password

mod common;

use chrono::{Duration, Utc};
use common::{create_test_server, create_user, TestContext};
use recovery_core::service::EVENT_SOURCE;
use recovery_core::RecoveryRequest;
use recovery_server::crypto::verify_password;
use recovery_server::{AccountStore, PasswordUpdater, RecoveryRequestStore, UserStore};
use serde_json::{json, Value};

/// Stage a recovery through the API and return the token that was sent
async fn stage_restore(ctx: &TestContext, email: &str) -> String {
    let response = ctx
        .server
        .post("/password/restore")
        .json(&json!({ "email": email, "lang": "en" }))
        .await;
    assert_eq!(response.status_code(), 200);

    ctx.sender.get_token(email).expect("No token sent")
}

/// Test: unknown token is rejected
#[tokio::test]
async fn test_update_with_unknown_token() {
    let mut ctx = create_test_server();

    let response = ctx
        .server
        .post("/password/update")
        .json(&json!({
            "token": "foo",
            "password": "newpassword",
            "confirm_password": "newpassword"
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["reason"], "Invalid recovery token");
    assert!(ctx.events.try_recv().is_err());
}

/// Test: expired token is rejected and left for the sweeper
#[tokio::test]
async fn test_update_with_expired_token() {
    let mut ctx = create_test_server();
    let user_id = create_user(&ctx.store, "Expired", "expired@example.com");
    ctx.store
        .save(&RecoveryRequest {
            user_id,
            token: "stale".to_string(),
            expiry_date: Utc::now() - Duration::hours(1),
        })
        .unwrap();

    let response = ctx
        .server
        .post("/password/update")
        .json(&json!({
            "token": "stale",
            "password": "newpassword",
            "confirm_password": "newpassword"
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["reason"], "Recovery token expired");
    assert!(ctx.store.find_by_token("stale").unwrap().is_some());
    assert!(ctx.events.try_recv().is_err());
}

/// Test: valid token publishes a password update and is consumed
#[tokio::test]
async fn test_update_with_valid_token() {
    let mut ctx = create_test_server();
    let email = "valid@example.com";
    let user_id = create_user(&ctx.store, "Valid", email);
    let token = stage_restore(&ctx, email).await;

    let response = ctx
        .server
        .post("/password/update")
        .json(&json!({
            "token": token,
            "password": "newpassword",
            "confirm_password": "newpassword"
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    let event = ctx.events.try_recv().expect("No password update event");
    assert_eq!(event.source, EVENT_SOURCE);
    assert_eq!(event.user_id, user_id);
    assert_eq!(event.new_password, "newpassword");
    assert!(ctx.events.try_recv().is_err());

    assert!(ctx.store.find_by_token(&token).unwrap().is_none());
}

/// Test: a consumed token cannot be used again
#[tokio::test]
async fn test_token_is_single_use() {
    let ctx = create_test_server();
    let email = "single@example.com";
    create_user(&ctx.store, "Single", email);
    let token = stage_restore(&ctx, email).await;

    let request = json!({
        "token": token,
        "password": "newpassword",
        "confirm_password": "newpassword"
    });

    let first = ctx.server.post("/password/update").json(&request).await;
    assert_eq!(first.status_code(), 200);

    let second = ctx.server.post("/password/update").json(&request).await;
    assert_eq!(second.status_code(), 400);
    let body: Value = second.json();
    assert_eq!(body["reason"], "Invalid recovery token");
}

/// Test: mismatched confirmation is rejected before the token is touched
#[tokio::test]
async fn test_update_password_mismatch() {
    let ctx = create_test_server();
    let email = "mismatch@example.com";
    create_user(&ctx.store, "Mismatch", email);
    let token = stage_restore(&ctx, email).await;

    let response = ctx
        .server
        .post("/password/update")
        .json(&json!({
            "token": token,
            "password": "newpassword",
            "confirm_password": "otherpassword"
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["reason"], "Passwords do not match");
    assert!(ctx.store.find_by_token(&token).unwrap().is_some());
}

/// Test: password length limits are enforced
#[tokio::test]
async fn test_update_password_length_limits() {
    let ctx = create_test_server();
    let email = "length@example.com";
    create_user(&ctx.store, "Length", email);
    let token = stage_restore(&ctx, email).await;

    let short = "short";
    let response = ctx
        .server
        .post("/password/update")
        .json(&json!({ "token": token, "password": short, "confirm_password": short }))
        .await;
    assert_eq!(response.status_code(), 400);

    let long = "x".repeat(81);
    let response = ctx
        .server
        .post("/password/update")
        .json(&json!({ "token": token, "password": long, "confirm_password": long }))
        .await;
    assert_eq!(response.status_code(), 400);

    assert!(ctx.store.find_by_token(&token).unwrap().is_some());
}

/// Test: the updater listening on the event channel changes the stored password
#[tokio::test]
async fn test_full_recovery_changes_password() {
    let ctx = create_test_server();
    let TestContext {
        server,
        sender,
        store,
        mut events,
    } = ctx;
    let email = "full@example.com";
    let user_id = create_user(&store, "Full", email);
    let updater = PasswordUpdater::new(store.clone());

    server
        .post("/password/restore")
        .json(&json!({ "email": email }))
        .await;
    let token = sender.get_token(email).unwrap();

    let response = server
        .post("/password/update")
        .json(&json!({
            "token": token,
            "password": "brandnewpass",
            "confirm_password": "brandnewpass"
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let event = events.try_recv().expect("No password update event");
    updater.apply(&event).unwrap();

    let hash = store.password_hash(user_id).unwrap().unwrap();
    assert!(verify_password("brandnewpass", &hash).unwrap());

    // Consumed request no longer blocks a new one
    assert!(store.find_by_email(email).unwrap().unwrap().recovery_request.is_none());
}
