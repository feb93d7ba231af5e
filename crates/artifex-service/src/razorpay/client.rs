//! Razorpay API client implementation.

use std::time::Duration;

use reqwest::Client;

use super::types::{CreateOrderRequest, GatewayErrorResponse, Order};
use crate::crypto::{constant_time_eq, hmac_sha256_hex};

/// Error type for gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum RazorpayError {
    /// HTTP request failed (connect error, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned an error response.
    #[error("gateway error: {code} - {description}")]
    Api {
        /// Gateway error code.
        code: String,
        /// Gateway error description.
        description: String,
    },

    /// The relayed checkout signature did not verify.
    #[error("invalid checkout signature")]
    InvalidSignature,
}

/// Razorpay API client.
#[derive(Debug, Clone)]
pub struct RazorpayClient {
    client: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    /// Create a new gateway client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RazorpayError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        })
    }

    /// Create an order for a credit purchase.
    ///
    /// `amount` is in currency subunits; `receipt` is our transaction ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway rejects it.
    pub async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<Order, RazorpayError> {
        let body = CreateOrderRequest {
            amount,
            currency: currency.to_string(),
            receipt: receipt.to_string(),
        };

        tracing::debug!(amount = %amount, currency = %currency, receipt = %receipt, "Creating gateway order");

        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Fetch an order by its gateway ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway rejects it.
    pub async fn fetch_order(&self, order_id: &str) -> Result<Order, RazorpayError> {
        let response = self
            .client
            .get(format!("{}/orders/{order_id}", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Verify a checkout signature relayed by the client.
    ///
    /// The gateway signs `"{order_id}|{payment_id}"` with the key secret; the
    /// comparison is constant-time.
    ///
    /// # Errors
    ///
    /// Returns `RazorpayError::InvalidSignature` on mismatch.
    pub fn verify_checkout_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), RazorpayError> {
        let payload = format!("{order_id}|{payment_id}");
        let expected = hmac_sha256_hex(&self.key_secret, &payload);

        if constant_time_eq(&expected, signature) {
            Ok(())
        } else {
            Err(RazorpayError::InvalidSignature)
        }
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RazorpayError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let error_body: Result<GatewayErrorResponse, _> = response.json().await;

        match error_body {
            Ok(gateway_error) => Err(RazorpayError::Api {
                code: gateway_error.error.code,
                description: gateway_error.error.description,
            }),
            Err(_) => Err(RazorpayError::Api {
                code: "unknown".to_string(),
                description: format!("HTTP {status}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> RazorpayClient {
        RazorpayClient::new(
            "http://localhost",
            "rzp_test_key",
            "rzp_test_secret",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn checkout_signature_roundtrip() {
        let client = test_client();
        let signature = hmac_sha256_hex("rzp_test_secret", "order_1|pay_1");

        assert!(client
            .verify_checkout_signature("order_1", "pay_1", &signature)
            .is_ok());
    }

    #[test]
    fn tampered_signature_rejected() {
        let client = test_client();
        let signature = hmac_sha256_hex("rzp_test_secret", "order_1|pay_1");

        let result = client.verify_checkout_signature("order_1", "pay_2", &signature);
        assert!(matches!(result, Err(RazorpayError::InvalidSignature)));
    }
}
