//! Razorpay payment gateway integration.
//!
//! A narrow adapter over the Razorpay orders REST API: create an order at
//! payment initiation, fetch it at verification. The order's `receipt` field
//! carries our transaction ID, which is how a paid order is matched back to
//! the pending purchase.

mod client;
mod types;

pub use client::{RazorpayClient, RazorpayError};
pub use types::{Order, OrderStatus};
