//! Account, login and transfer endpoints.
use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
};
use bankapi_common::{
    Account, CreateAccountRequest, DeleteAccountResponse, LoginRequest, LoginResponse,
    TransferRequest, TOKEN_HEADER,
};
use serde_json::{json, Value};

use super::AppJson;
use crate::{auth::AuthorizedAccount, error::AppError, AppState};

/// GET /account
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<AppJson<Vec<Account>>, AppError> {
    Ok(AppJson(state.service.list_accounts().await?))
}

/// POST /account
///
/// Responds 201 with the account body; the new token travels in the
/// `x-jwt-token` response header.
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<CreateAccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (account, token) = state.service.register(request).await?;
    Ok((StatusCode::CREATED, [(TOKEN_HEADER, token)], AppJson(account)))
}

/// GET /account/{id} (gated)
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Extension(AuthorizedAccount(id)): Extension<AuthorizedAccount>,
) -> Result<AppJson<Account>, AppError> {
    Ok(AppJson(state.service.get_account(id).await?))
}

/// DELETE /account/{id} (gated)
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(AuthorizedAccount(id)): Extension<AuthorizedAccount>,
) -> Result<AppJson<DeleteAccountResponse>, AppError> {
    let deleted_id = state.service.delete_account(id).await?;
    Ok(AppJson(DeleteAccountResponse { deleted_id }))
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<AppJson<LoginResponse>, AppError> {
    let token = state.service.login(request).await?;
    Ok(AppJson(LoginResponse { token }))
}

/// POST /transfer
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<TransferRequest>,
) -> Result<AppJson<TransferRequest>, AppError> {
    Ok(AppJson(state.service.transfer(request).await?))
}

/// GET /health
pub async fn health() -> AppJson<Value> {
    AppJson(json!({ "status": "ok" }))
}
