//! Application state.

use std::sync::Arc;
use std::time::Duration;

use artifex_store::RocksStore;

use crate::clipdrop::ClipdropClient;
use crate::config::ServiceConfig;
use crate::razorpay::RazorpayClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Payment gateway client (optional).
    pub gateway: Option<Arc<RazorpayClient>>,

    /// Text-to-image client (optional).
    pub imagegen: Option<Arc<ClipdropClient>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let timeout = Duration::from_secs(config.adapter_timeout_seconds);

        let gateway = config
            .razorpay_key_id
            .as_ref()
            .zip(config.razorpay_key_secret.as_ref())
            .and_then(|(key_id, key_secret)| {
                match RazorpayClient::new(&config.razorpay_api_url, key_id, key_secret, timeout) {
                    Ok(client) => {
                        tracing::info!(gateway_url = %config.razorpay_api_url, "Payment gateway enabled");
                        Some(Arc::new(client))
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to create gateway client");
                        None
                    }
                }
            });

        if gateway.is_none() {
            tracing::warn!("Payment gateway not configured - purchases will not be available");
        }

        let imagegen = config.clipdrop_api_key.as_ref().and_then(|key| {
            match ClipdropClient::new(&config.clipdrop_api_url, key, timeout) {
                Ok(client) => {
                    tracing::info!(image_api_url = %config.clipdrop_api_url, "Image generation enabled");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create image API client");
                    None
                }
            }
        });

        if imagegen.is_none() {
            tracing::warn!("Image API not configured - generation will not be available");
        }

        Self {
            store,
            config,
            gateway,
            imagegen,
        }
    }
}
