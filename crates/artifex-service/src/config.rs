//! Service configuration.

use serde::Deserialize;
use std::path::Path;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/artifex").
    pub data_dir: String,

    /// Secret for signing and verifying JWTs (HS256).
    pub jwt_secret: String,

    /// Token lifetime in days (default: 7).
    pub token_ttl_days: i64,

    /// Razorpay key id (optional; payments disabled without it).
    pub razorpay_key_id: Option<String>,

    /// Razorpay key secret (optional).
    pub razorpay_key_secret: Option<String>,

    /// Razorpay API base URL (overridable for tests).
    pub razorpay_api_url: String,

    /// Currency code for gateway orders (default: "USD").
    pub currency: String,

    /// Clipdrop API key (optional; generation disabled without it).
    pub clipdrop_api_key: Option<String>,

    /// Clipdrop API base URL (overridable for tests).
    pub clipdrop_api_url: String,

    /// Outbound adapter timeout in seconds.
    pub adapter_timeout_seconds: u64,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Razorpay secrets file structure.
#[derive(Debug, Deserialize)]
struct RazorpaySecrets {
    key_id: String,
    key_secret: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let (razorpay_key_id, razorpay_key_secret) = load_razorpay_secrets();

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set - using development default");
            "artifex-dev-secret".into()
        });

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/artifex".into()),
            jwt_secret,
            token_ttl_days: std::env::var("TOKEN_TTL_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
            razorpay_key_id,
            razorpay_key_secret,
            razorpay_api_url: std::env::var("RAZORPAY_API_URL")
                .unwrap_or_else(|_| "https://api.razorpay.com/v1".into()),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "USD".into()),
            clipdrop_api_key: std::env::var("CLIPDROP_API_KEY").ok(),
            clipdrop_api_url: std::env::var("CLIPDROP_API_URL")
                .unwrap_or_else(|_| "https://clipdrop-api.co".into()),
            adapter_timeout_seconds: std::env::var("ADAPTER_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        }
    }
}

/// Load Razorpay secrets from file or environment.
fn load_razorpay_secrets() -> (Option<String>, Option<String>) {
    let secret_paths = [
        ".secrets/razorpay.json",
        "artifex/.secrets/razorpay.json",
        "../.secrets/razorpay.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<RazorpaySecrets>(path) {
            tracing::info!(path = %path, "Loaded Razorpay secrets from file");
            return (Some(secrets.key_id), Some(secrets.key_secret));
        }
    }

    tracing::debug!("Razorpay secrets file not found, using environment variables");
    (
        std::env::var("RAZORPAY_KEY_ID").ok(),
        std::env::var("RAZORPAY_KEY_SECRET").ok(),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/artifex".into(),
            jwt_secret: "artifex-dev-secret".into(),
            token_ttl_days: 7,
            razorpay_key_id: None,
            razorpay_key_secret: None,
            razorpay_api_url: "https://api.razorpay.com/v1".into(),
            currency: "USD".into(),
            clipdrop_api_key: None,
            clipdrop_api_url: "https://clipdrop-api.co".into(),
            adapter_timeout_seconds: 30,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 60,
        }
    }
}
