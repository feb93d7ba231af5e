//! Image generation handler: the debit path of the credit ledger.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use artifex_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Image generation request.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// The text prompt.
    pub prompt: String,
}

/// Image generation response.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Balance after the debit.
    pub balance: i64,
    /// The generated image as a `data:image/png;base64,...` URL.
    pub image: String,
}

/// Generate an image, debiting one credit on success.
///
/// The debit happens only after the image arrives, as a single atomic store
/// operation, so a failed upstream call never mutates the balance and
/// concurrent requests cannot double-spend the last credit.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let prompt = body.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::BadRequest("Prompt is required".into()));
    }

    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    // Fail fast with the balance so the client can redirect to purchase.
    // The authoritative check is inside debit_credit.
    if !user.can_generate() {
        return Err(ApiError::InsufficientCredit {
            balance: user.credit_balance,
        });
    }

    let imagegen = state
        .imagegen
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Image API not configured".into()))?;

    let image_bytes = imagegen.text_to_image(prompt).await.map_err(|e| {
        tracing::error!(error = %e, user_id = %auth.user_id, "Image generation failed");
        ApiError::ExternalService("Image generation failed".into())
    })?;

    let balance = state.store.debit_credit(&auth.user_id)?;

    tracing::info!(
        user_id = %auth.user_id,
        balance = %balance,
        image_bytes = %image_bytes.len(),
        "Image generated"
    );

    let image = format!("data:image/png;base64,{}", BASE64.encode(&image_bytes));

    Ok(Json(GenerateResponse { balance, image }))
}
