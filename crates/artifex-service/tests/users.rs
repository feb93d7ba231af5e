//! Registration, login, and balance integration tests.

mod common;

use common::TestHarness;
use serde_json::{json, Value};

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn register_returns_token_and_zero_balance() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/v1/users/register")
        .json(&json!({ "name": "A", "email": "a@x.com", "password": "p" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["name"], "A");
    assert_eq!(body["user"]["balance"], 0);
}

#[tokio::test]
async fn register_missing_fields_fails() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/v1/users/register")
        .json(&json!({ "name": "", "email": "a@x.com", "password": "p" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn register_duplicate_email_conflicts() {
    let harness = TestHarness::new().await;

    harness.register("A", "a@x.com", "p").await;

    let response = harness
        .server
        .post("/v1/users/register")
        .json(&json!({ "name": "B", "email": "A@X.com", "password": "q" }))
        .await;

    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "conflict");
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn register_login_credits_scenario() {
    let harness = TestHarness::new().await;

    harness.register("A", "a@x.com", "p").await;

    let response = harness
        .server
        .post("/v1/users/login")
        .json(&json!({ "email": "a@x.com", "password": "p" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let token = body["token"].as_str().unwrap().to_string();

    let response = harness
        .server
        .get("/v1/credits/balance")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["balance"], 0);
    assert_eq!(body["user"]["name"], "A");
}

#[tokio::test]
async fn login_wrong_password_unauthorized() {
    let harness = TestHarness::new().await;

    harness.register("A", "a@x.com", "p").await;

    let response = harness
        .server
        .post("/v1/users/login")
        .json(&json!({ "email": "a@x.com", "password": "wrong" }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn login_unknown_email_unauthorized() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/v1/users/login")
        .json(&json!({ "email": "ghost@x.com", "password": "p" }))
        .await;

    response.assert_status_unauthorized();
}

// ============================================================================
// Balance auth
// ============================================================================

#[tokio::test]
async fn balance_without_auth_fails() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/v1/credits/balance").await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn balance_with_garbage_token_fails() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .get("/v1/credits/balance")
        .add_header("authorization", "Bearer not.a.jwt")
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn transactions_empty_for_new_user() {
    let harness = TestHarness::new().await;
    let token = harness.register("A", "a@x.com", "p").await;

    let response = harness
        .server
        .get("/v1/credits/transactions")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["transactions"].as_array().unwrap().len(), 0);
    assert_eq!(body["has_more"], false);
}
