//! Tests for requesting a password recovery email

mod common;

use common::{create_test_server, create_user, TEST_TOPIC};
use recovery_core::PASSWORD_RECOVERY_ROUTING_KEY;
use serde_json::{json, Value};

/// Test: unknown email is rejected with 404
#[tokio::test]
async fn test_restore_unknown_email() {
    let ctx = create_test_server();

    let response = ctx
        .server
        .post("/password/restore")
        .json(&json!({ "email": "nobody@example.com", "lang": "en" }))
        .await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(ctx.sender.count(), 0);
}

/// Test: restore sends a notification to the configured topic
#[tokio::test]
async fn test_restore_sends_notification() {
    let ctx = create_test_server();
    let email = "restore@example.com";
    let user_id = create_user(&ctx.store, "Restore", email);

    let response = ctx
        .server
        .post("/password/restore")
        .json(&json!({ "email": email, "lang": "ua" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    let sent = ctx.sender.sent.read().unwrap();
    assert_eq!(sent.len(), 1);
    let (destination, routing_key, message) = &sent[0];
    assert_eq!(destination, TEST_TOPIC);
    assert_eq!(routing_key, PASSWORD_RECOVERY_ROUTING_KEY);
    assert_eq!(message.user_id, user_id);
    assert_eq!(message.user_name, "Restore");
    assert_eq!(message.email, email);
    assert_eq!(message.language, "ua");
    assert!(!message.token.is_empty());
}

/// Test: language defaults to English
#[tokio::test]
async fn test_restore_defaults_language() {
    let ctx = create_test_server();
    let email = "nolang@example.com";
    create_user(&ctx.store, "No Lang", email);

    let response = ctx
        .server
        .post("/password/restore")
        .json(&json!({ "email": email }))
        .await;

    assert_eq!(response.status_code(), 200);
    let sent = ctx.sender.sent.read().unwrap();
    assert_eq!(sent[0].2.language, "en");
}

/// Test: second restore while one is pending is rejected
#[tokio::test]
async fn test_restore_twice_rejected() {
    let ctx = create_test_server();
    let email = "twice@example.com";
    create_user(&ctx.store, "Twice", email);

    ctx.server
        .post("/password/restore")
        .json(&json!({ "email": email }))
        .await;

    let response = ctx
        .server
        .post("/password/restore")
        .json(&json!({ "email": email }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(ctx.sender.count(), 1);
}

/// Test: recovery_status reflects the pending request
#[tokio::test]
async fn test_recovery_status_transitions() {
    let ctx = create_test_server();
    let email = "status@example.com";
    create_user(&ctx.store, "Status", email);

    let response = ctx
        .server
        .get(&format!("/password/recovery_status?email={}", email))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "complete");

    ctx.server
        .post("/password/restore")
        .json(&json!({ "email": email }))
        .await;

    let response = ctx
        .server
        .get(&format!("/password/recovery_status?email={}", email))
        .await;
    let body: Value = response.json();
    assert_eq!(body["status"], "pending");
}

/// Test: recovery_status for an unknown email is 404
#[tokio::test]
async fn test_recovery_status_unknown_email() {
    let ctx = create_test_server();

    let response = ctx
        .server
        .get("/password/recovery_status?email=ghost@example.com")
        .await;

    assert_eq!(response.status_code(), 404);
}
