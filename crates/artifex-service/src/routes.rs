//! Router configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, images, payments, users};
use crate::state::AppState;

/// Maximum concurrent requests for generation endpoints. Each generation
/// holds an outbound connection to the image API for seconds; cap them so a
/// burst cannot exhaust the upstream quota.
const GENERATION_MAX_CONCURRENT_REQUESTS: usize = 20;

/// Maximum concurrent requests for general API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `POST /v1/users/register` - Register
/// - `POST /v1/users/login` - Login
///
/// ## Authenticated (bearer token)
/// - `GET /v1/credits/balance` - Current balance
/// - `GET /v1/credits/transactions` - Purchase history
/// - `POST /v1/images/generate` - Generate an image (debits one credit)
/// - `POST /v1/payments` - Initiate a credit purchase
/// - `POST /v1/payments/verify` - Verify a payment and credit the purchase
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let generation_routes = Router::new()
        .route("/generate", post(images::generate))
        .layer(ConcurrencyLimitLayer::new(
            GENERATION_MAX_CONCURRENT_REQUESTS,
        ));

    let api_routes = Router::new()
        // Users
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        // Credits
        .route("/credits/balance", get(users::get_balance))
        .route("/credits/transactions", get(users::list_transactions))
        // Payments
        .route("/payments", post(payments::initiate))
        .route("/payments/verify", post(payments::verify))
        // Image generation (with its own concurrency limit)
        .nest("/images", generation_routes)
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public, no rate limit)
        .route("/health", get(health::health))
        // API v1 routes
        .nest("/v1", api_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
