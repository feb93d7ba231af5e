//! Clipdrop text-to-image integration.
//!
//! One outbound call per generation: post the prompt as a multipart form,
//! receive raw PNG bytes. No retry or caching; a failed call performs no
//! mutation upstream because the debit only happens after the image arrives.

use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::Client;

/// Error type for image generation.
#[derive(Debug, thiserror::Error)]
pub enum ClipdropError {
    /// HTTP request failed (connect error, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The image API returned a non-success status.
    #[error("image API error: HTTP {status}")]
    Api {
        /// The upstream HTTP status code.
        status: u16,
    },
}

/// Clipdrop text-to-image client.
#[derive(Debug, Clone)]
pub struct ClipdropClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ClipdropClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClipdropError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Generate an image from a prompt, returning raw PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API responds with a
    /// non-success status.
    pub async fn text_to_image(&self, prompt: &str) -> Result<Vec<u8>, ClipdropError> {
        let form = Form::new().text("prompt", prompt.to_string());

        let response = self
            .client
            .post(format!("{}/text-to-image/v1", self.base_url))
            .header("x-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Image API returned non-success status");
            return Err(ClipdropError::Api {
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
