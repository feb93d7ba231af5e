//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing, invalid, or expired credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid or missing input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict - resource already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Not enough credits for an image generation.
    #[error("insufficient credit: balance={balance}")]
    InsufficientCredit {
        /// Current balance.
        balance: i64,
    },

    /// The selected plan is not in the plan table.
    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    /// The gateway order has not been paid yet. Retryable.
    #[error("payment not completed yet")]
    PaymentPending,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Upstream image or payment API failure.
    #[error("external service error: {0}")]
    ExternalService(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
                None,
            ),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone(), None),
            Self::InsufficientCredit { balance } => (
                StatusCode::PAYMENT_REQUIRED,
                "insufficient_credit",
                self.to_string(),
                Some(serde_json::json!({ "balance": balance })),
            ),
            Self::InvalidPlan(plan) => (
                StatusCode::BAD_REQUEST,
                "invalid_plan",
                format!("invalid plan: {plan}"),
                None,
            ),
            Self::PaymentPending => (
                StatusCode::CONFLICT,
                "payment_pending",
                self.to_string(),
                None,
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            Self::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                "external_service_error",
                msg.clone(),
                None,
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<artifex_store::StoreError> for ApiError {
    fn from(err: artifex_store::StoreError) -> Self {
        match err {
            artifex_store::StoreError::NotFound => Self::NotFound("record not found".into()),
            artifex_store::StoreError::EmailTaken { email } => {
                Self::Conflict(format!("email already registered: {email}"))
            }
            artifex_store::StoreError::InsufficientCredit { balance } => {
                Self::InsufficientCredit { balance }
            }
            artifex_store::StoreError::Database(msg)
            | artifex_store::StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}
