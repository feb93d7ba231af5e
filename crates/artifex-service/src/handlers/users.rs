//! Registration, login, and credit balance handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use artifex_core::{Transaction, User};
use artifex_store::Store;

use crate::auth::{issue_token, AuthUser};
use crate::error::ApiError;
use crate::password;
use crate::state::AppState;

/// Public view of a user.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    /// Display name.
    pub name: String,
    /// Current credit balance.
    pub balance: i64,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            balance: user.credit_balance,
        }
    }
}

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Email address (unique).
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Response for register and login: a token plus the user summary.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated user.
    pub user: UserSummary,
}

/// Register a new user.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let name = body.name.trim();
    let email = body.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest("All fields are required".into()));
    }
    if !email.contains('@') {
        return Err(ApiError::BadRequest("Invalid email address".into()));
    }

    let password_hash = password::hash(body.password).await?;
    let user = User::new(name.to_string(), email, password_hash);

    state.store.create_user(&user)?;

    tracing::info!(user_id = %user.id, "User registered");

    let token = issue_token(user.id, &state.config.jwt_secret, state.config.token_ttl_days)?;

    Ok(Json(AuthResponse {
        token,
        user: UserSummary::from(&user),
    }))
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Log in with email and password.
///
/// Unknown email and wrong password both map to `Unauthorized` so the API
/// does not disclose which emails are registered.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = body.email.trim().to_lowercase();

    let Some(user) = state.store.find_user_by_email(&email)? else {
        return Err(ApiError::Unauthorized);
    };

    if !password::verify(body.password, user.password_hash.clone()).await? {
        return Err(ApiError::Unauthorized);
    }

    tracing::info!(user_id = %user.id, "User logged in");

    let token = issue_token(user.id, &state.config.jwt_secret, state.config.token_ttl_days)?;

    Ok(Json(AuthResponse {
        token,
        user: UserSummary::from(&user),
    }))
}

/// Balance response.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Current credit balance.
    pub balance: i64,
    /// The user summary.
    pub user: UserSummary,
}

/// Get the current credit balance.
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<BalanceResponse>, ApiError> {
    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(BalanceResponse {
        balance: user.credit_balance,
        user: UserSummary::from(&user),
    }))
}

/// Transaction list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Maximum number of transactions to return (default: 50).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// One purchase in the history listing.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: String,
    /// Plan name.
    pub plan: String,
    /// Credits granted on settlement.
    pub credits: i64,
    /// Price in major currency units.
    pub amount: i64,
    /// Whether the payment has settled.
    pub settled: bool,
    /// Timestamp.
    pub created_at: String,
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.to_string(),
            plan: tx.plan.to_string(),
            credits: tx.credits,
            amount: tx.amount,
            settled: tx.settled,
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}

/// List transactions response.
#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    /// Transactions (newest first).
    pub transactions: Vec<TransactionResponse>,
    /// Whether there are more transactions.
    pub has_more: bool,
}

/// List purchase history.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    // Fetch one more than requested to determine has_more
    let limit = query.limit.min(100);
    let transactions =
        state
            .store
            .list_transactions_by_user(&auth.user_id, limit + 1, query.offset)?;

    let has_more = transactions.len() > limit;
    let transactions: Vec<_> = transactions
        .iter()
        .take(limit)
        .map(TransactionResponse::from)
        .collect();

    Ok(Json(ListTransactionsResponse {
        transactions,
        has_more,
    }))
}
