//! Payment initiation and verification: the credit path of the ledger.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use artifex_core::{Plan, Transaction, TransactionId};
use artifex_store::{Settlement, Store};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::razorpay::{Order, RazorpayClient};
use crate::state::AppState;

/// Payment initiation request.
#[derive(Debug, Deserialize)]
pub struct InitiatePaymentRequest {
    /// Plan id: `Basic`, `Advanced`, or `Business`.
    pub plan: String,
}

/// Payment initiation response.
#[derive(Debug, Serialize)]
pub struct InitiatePaymentResponse {
    /// The gateway order for the client checkout flow.
    pub order: Order,
    /// Our transaction ID (also the order's receipt).
    pub transaction_id: String,
}

/// Initiate a credit purchase: persist a pending transaction, then create a
/// gateway order whose receipt references it.
pub async fn initiate(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<InitiatePaymentRequest>,
) -> Result<Json<InitiatePaymentResponse>, ApiError> {
    // Reject unknown plans before anything is persisted.
    let plan: Plan = body
        .plan
        .parse()
        .map_err(|_| ApiError::InvalidPlan(body.plan.clone()))?;

    let gateway = require_gateway(&state)?;

    state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let transaction = Transaction::pending(auth.user_id, plan);
    state.store.put_transaction(&transaction)?;

    // Gateway orders are denominated in subunits.
    let order = gateway
        .create_order(
            transaction.amount * 100,
            &state.config.currency,
            &transaction.id.to_string(),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, transaction_id = %transaction.id, "Gateway order creation failed");
            ApiError::ExternalService("Payment initiation failed".into())
        })?;

    tracing::info!(
        user_id = %auth.user_id,
        transaction_id = %transaction.id,
        order_id = %order.id,
        plan = %plan,
        "Payment initiated"
    );

    Ok(Json(InitiatePaymentResponse {
        order,
        transaction_id: transaction.id.to_string(),
    }))
}

/// Payment verification request.
///
/// `payment_id` and `signature` are the checkout result relayed by the
/// client; when present the signature is verified before the order status is
/// consulted. The order-status fetch remains the authoritative check.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    /// Gateway order ID.
    pub order_id: String,
    /// Gateway payment ID from the checkout result (optional).
    pub payment_id: Option<String>,
    /// Checkout signature from the checkout result (optional).
    pub signature: Option<String>,
}

/// Payment verification response.
#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    /// Balance after verification.
    pub balance: i64,
    /// Whether this call performed the settlement (false on replays).
    pub settled_now: bool,
}

/// Verify a payment and credit the purchased amount exactly once.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>, ApiError> {
    if body.order_id.is_empty() {
        return Err(ApiError::BadRequest("Order ID is required".into()));
    }

    let gateway = require_gateway(&state)?;

    if let (Some(payment_id), Some(signature)) = (&body.payment_id, &body.signature) {
        gateway
            .verify_checkout_signature(&body.order_id, payment_id, signature)
            .map_err(|_| {
                tracing::warn!(order_id = %body.order_id, "Invalid checkout signature");
                ApiError::Unauthorized
            })?;
    }

    let order = gateway.fetch_order(&body.order_id).await.map_err(|e| {
        tracing::error!(error = %e, order_id = %body.order_id, "Gateway order fetch failed");
        ApiError::ExternalService("Payment verification failed".into())
    })?;

    if !order.status.is_paid() {
        return Err(ApiError::PaymentPending);
    }

    let transaction_id: TransactionId = order
        .receipt
        .as_deref()
        .and_then(|r| r.parse().ok())
        .ok_or_else(|| ApiError::NotFound("Transaction not found".into()))?;

    // Settlement only for the transaction's owner.
    let transaction = state
        .store
        .get_transaction(&transaction_id)?
        .ok_or_else(|| ApiError::NotFound("Transaction not found".into()))?;
    if transaction.user_id != auth.user_id {
        return Err(ApiError::NotFound("Transaction not found".into()));
    }

    let settlement = state.store.settle_and_credit(&transaction_id)?;

    let (balance, settled_now) = match settlement {
        Settlement::Credited { balance } => {
            tracing::info!(
                user_id = %auth.user_id,
                transaction_id = %transaction_id,
                credits = %transaction.credits,
                balance = %balance,
                "Credits added"
            );
            (balance, true)
        }
        Settlement::AlreadySettled { balance } => {
            tracing::info!(
                transaction_id = %transaction_id,
                "Payment already processed"
            );
            (balance, false)
        }
    };

    Ok(Json(VerifyPaymentResponse {
        balance,
        settled_now,
    }))
}

fn require_gateway(state: &AppState) -> Result<&Arc<RazorpayClient>, ApiError> {
    state
        .gateway
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Payment gateway not configured".into()))
}
