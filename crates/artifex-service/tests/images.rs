//! Image generation integration tests.

mod common;

use std::sync::atomic::Ordering;

use common::TestHarness;
use serde_json::{json, Value};

#[tokio::test]
async fn generate_without_credits_is_payment_required() {
    let harness = TestHarness::new().await;
    let token = harness.register("A", "a@x.com", "p").await;

    let response = harness
        .server
        .post("/v1/images/generate")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&json!({ "prompt": "a fox" }))
        .await;

    assert_eq!(response.status_code(), 402);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "insufficient_credit");
    assert_eq!(body["error"]["details"]["balance"], 0);
}

#[tokio::test]
async fn generate_debits_exactly_one_credit() {
    let harness = TestHarness::new().await;
    let token = harness.register("A", "a@x.com", "p").await;

    let balance = harness.purchase(&token, "Basic").await;
    assert_eq!(balance, 100);

    let response = harness
        .server
        .post("/v1/images/generate")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&json!({ "prompt": "a fox in a spacesuit" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["balance"], 99);
    assert!(body["image"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));

    // The debit is visible on the balance endpoint
    let response = harness
        .server
        .get("/v1/credits/balance")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;
    let body: Value = response.json();
    assert_eq!(body["balance"], 99);
}

#[tokio::test]
async fn generate_empty_prompt_is_bad_request() {
    let harness = TestHarness::new().await;
    let token = harness.register("A", "a@x.com", "p").await;
    harness.purchase(&token, "Basic").await;

    let response = harness
        .server
        .post("/v1/images/generate")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&json!({ "prompt": "   " }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn failed_generation_does_not_debit() {
    let harness = TestHarness::new().await;
    let token = harness.register("A", "a@x.com", "p").await;
    harness.purchase(&token, "Basic").await;

    harness.image_ok.store(false, Ordering::SeqCst);

    let response = harness
        .server
        .post("/v1/images/generate")
        .add_header("authorization", TestHarness::bearer(&token))
        .json(&json!({ "prompt": "a fox" }))
        .await;

    assert_eq!(response.status_code(), 502);

    // Balance untouched
    let response = harness
        .server
        .get("/v1/credits/balance")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;
    let body: Value = response.json();
    assert_eq!(body["balance"], 100);
}

#[tokio::test]
async fn generate_without_auth_fails() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/v1/images/generate")
        .json(&json!({ "prompt": "a fox" }))
        .await;

    response.assert_status_unauthorized();
}
