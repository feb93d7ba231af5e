//! Razorpay API types.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a gateway order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order created, no payment attempted yet.
    Created,
    /// A payment was attempted but has not (yet) succeeded.
    Attempted,
    /// Payment captured; the order is complete.
    Paid,
}

impl OrderStatus {
    /// Whether the order has been paid in full.
    #[must_use]
    pub fn is_paid(self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// A gateway order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Gateway order ID (e.g. `order_...`).
    pub id: String,

    /// Amount in currency subunits.
    pub amount: i64,

    /// ISO currency code.
    pub currency: String,

    /// Our receipt reference: the transaction ID string.
    pub receipt: Option<String>,

    /// Current order status.
    pub status: OrderStatus,

    /// Creation time (unix seconds).
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Request body for order creation.
#[derive(Debug, Serialize)]
pub struct CreateOrderRequest {
    /// Amount in currency subunits.
    pub amount: i64,
    /// ISO currency code.
    pub currency: String,
    /// Receipt reference (our transaction ID).
    pub receipt: String,
}

/// Error envelope returned by the gateway.
#[derive(Debug, Deserialize)]
pub struct GatewayErrorResponse {
    /// The error payload.
    pub error: GatewayErrorBody,
}

/// Error payload returned by the gateway.
#[derive(Debug, Deserialize)]
pub struct GatewayErrorBody {
    /// Error code (e.g. `BAD_REQUEST_ERROR`).
    pub code: String,
    /// Human-readable description.
    pub description: String,
}
