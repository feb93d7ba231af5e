//! Common test utilities for artifex integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use artifex_service::{create_router, AppState, ServiceConfig};
use artifex_store::RocksStore;

/// Shared state behind the stub gateway: orders created so far and whether
/// fetches should report them as paid.
#[derive(Clone, Default)]
pub struct StubGateway {
    orders: Arc<Mutex<HashMap<String, Value>>>,
    next_id: Arc<AtomicU64>,
    /// When true, fetched orders report status "paid".
    pub paid: Arc<AtomicBool>,
}

struct CreateOrderResponder {
    gateway: StubGateway,
}

impl Respond for CreateOrderResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).expect("order request body");
        let n = self.gateway.next_id.fetch_add(1, Ordering::SeqCst);
        let id = format!("order_test{n}");

        let order = json!({
            "id": id,
            "entity": "order",
            "amount": body["amount"],
            "currency": body["currency"],
            "receipt": body["receipt"],
            "status": "created",
            "created_at": 1_700_000_000,
        });

        self.gateway
            .orders
            .lock()
            .unwrap()
            .insert(id, order.clone());

        ResponseTemplate::new(200).set_body_json(order)
    }
}

struct FetchOrderResponder {
    gateway: StubGateway,
}

impl Respond for FetchOrderResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let order_id = request
            .url
            .path_segments()
            .and_then(Iterator::last)
            .unwrap_or_default()
            .to_string();

        let orders = self.gateway.orders.lock().unwrap();
        let Some(order) = orders.get(&order_id) else {
            return ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": "BAD_REQUEST_ERROR", "description": "order not found" }
            }));
        };

        let mut order = order.clone();
        if self.gateway.paid.load(Ordering::SeqCst) {
            order["status"] = json!("paid");
        }

        ResponseTemplate::new(200).set_body_json(order)
    }
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// The wiremock server stubbing both external APIs.
    pub upstream: MockServer,
    /// Stub gateway state (flip `paid` to complete checkouts).
    pub gateway: StubGateway,
    /// When false, the image API stub responds with HTTP 500.
    pub image_ok: Arc<AtomicBool>,
}

impl TestHarness {
    /// Create a new test harness with a fresh database and stubbed upstreams.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RocksStore::open(temp_dir.path()).expect("Failed to open store");

        let upstream = MockServer::start().await;
        let gateway = StubGateway::default();
        let image_ok = Arc::new(AtomicBool::new(true));

        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(CreateOrderResponder {
                gateway: gateway.clone(),
            })
            .mount(&upstream)
            .await;

        Mock::given(method("GET"))
            .and(path_regex("^/orders/.+$"))
            .respond_with(FetchOrderResponder {
                gateway: gateway.clone(),
            })
            .mount(&upstream)
            .await;

        Mock::given(method("POST"))
            .and(path("/text-to-image/v1"))
            .respond_with(ImageResponder {
                ok: Arc::clone(&image_ok),
            })
            .mount(&upstream)
            .await;

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            jwt_secret: "test-secret".into(),
            token_ttl_days: 7,
            razorpay_key_id: Some("rzp_test_key".into()),
            razorpay_key_secret: Some("rzp_test_secret".into()),
            razorpay_api_url: upstream.uri(),
            currency: "USD".into(),
            clipdrop_api_key: Some("clip_test_key".into()),
            clipdrop_api_url: upstream.uri(),
            adapter_timeout_seconds: 5,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(Arc::new(store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
            upstream,
            gateway,
            image_ok,
        }
    }

    /// Register a user and return their bearer token.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> String {
        let response = self
            .server
            .post("/v1/users/register")
            .json(&json!({ "name": name, "email": email, "password": password }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        body["token"].as_str().expect("token in response").to_string()
    }

    /// Format a token as an Authorization header value.
    pub fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    /// Run a full purchase flow for the given plan, leaving the credits on
    /// the account. Returns the balance after settlement.
    pub async fn purchase(&self, token: &str, plan: &str) -> i64 {
        let response = self
            .server
            .post("/v1/payments")
            .add_header("authorization", Self::bearer(token))
            .json(&json!({ "plan": plan }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        let order_id = body["order"]["id"].as_str().unwrap().to_string();

        self.gateway.paid.store(true, Ordering::SeqCst);

        let response = self
            .server
            .post("/v1/payments/verify")
            .add_header("authorization", Self::bearer(token))
            .json(&json!({ "order_id": order_id }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["balance"].as_i64().expect("balance in response")
    }
}

struct ImageResponder {
    ok: Arc<AtomicBool>,
}

impl Respond for ImageResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        if self.ok.load(Ordering::SeqCst) {
            // A tiny stand-in for PNG bytes; the service treats it opaquely.
            ResponseTemplate::new(200).set_body_bytes(b"\x89PNG\r\n\x1a\nfakeimage".to_vec())
        } else {
            ResponseTemplate::new(500).set_body_string("upstream exploded")
        }
    }
}
