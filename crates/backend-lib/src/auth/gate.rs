// ============================
// bankapi-backend/src/auth/gate.rs
// ============================
//! Request-time ownership check for account-scoped routes.
//!
//! A request starts unauthenticated, presents a token through the
//! `x-jwt-token` header, and ends either authorized for exactly the account
//! named in its path or rejected. Every rejection looks the same to the
//! caller (`401 {"error":"Unauthorized"}`); the concrete reason is only
//! logged, so responses never reveal whether an account exists.
use axum::http::HeaderValue;
use bankapi_common::AccountId;
use metrics::counter;

use super::TokenIssuer;
use crate::error::AppError;
use crate::metrics::GATE_REJECTED;
use crate::storage::AccountStore;
use crate::validation::parse_account_id;

/// Account id the current request was authorized for, stored in request
/// extensions by the middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizedAccount(pub AccountId);

/// Why a request was turned away. Internal only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingToken,
    MalformedHeader,
    InvalidToken,
    InvalidPathId,
    AccountMismatch,
    AccountGone,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::MissingToken => "missing_token",
            RejectReason::MalformedHeader => "malformed_header",
            RejectReason::InvalidToken => "invalid_token",
            RejectReason::InvalidPathId => "invalid_path_id",
            RejectReason::AccountMismatch => "account_mismatch",
            RejectReason::AccountGone => "account_gone",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Authorized(AccountId),
    Rejected(RejectReason),
}

/// Run every check and report the outcome.
///
/// `Err` is reserved for storage failures while re-fetching the account.
pub async fn evaluate(
    tokens: &TokenIssuer,
    store: &dyn AccountStore,
    header: Option<&HeaderValue>,
    raw_path_id: &str,
) -> Result<GateOutcome, AppError> {
    let Some(header) = header else {
        return Ok(GateOutcome::Rejected(RejectReason::MissingToken));
    };
    let token = match header.to_str() {
        Ok(value) if !value.trim().is_empty() => value.trim(),
        _ => return Ok(GateOutcome::Rejected(RejectReason::MalformedHeader)),
    };

    let Ok(token_account) = tokens.validate(token) else {
        return Ok(GateOutcome::Rejected(RejectReason::InvalidToken));
    };

    let Ok(path_account) = parse_account_id(raw_path_id) else {
        return Ok(GateOutcome::Rejected(RejectReason::InvalidPathId));
    };
    if path_account != token_account {
        return Ok(GateOutcome::Rejected(RejectReason::AccountMismatch));
    }

    // The token may have outlived its account
    match store.get_account_by_id(token_account).await {
        Ok(_) => Ok(GateOutcome::Authorized(token_account)),
        Err(AppError::NotFound(_)) => Ok(GateOutcome::Rejected(RejectReason::AccountGone)),
        Err(e) => Err(e),
    }
}

/// Gate entry point used by the middleware
pub async fn authorize(
    tokens: &TokenIssuer,
    store: &dyn AccountStore,
    header: Option<&HeaderValue>,
    raw_path_id: &str,
) -> Result<AuthorizedAccount, AppError> {
    match evaluate(tokens, store, header, raw_path_id).await? {
        GateOutcome::Authorized(id) => Ok(AuthorizedAccount(id)),
        GateOutcome::Rejected(reason) => {
            tracing::warn!(
                reason = reason.as_str(),
                path_id = raw_path_id,
                "request rejected by gate"
            );
            counter!(GATE_REJECTED, "reason" => reason.as_str()).increment(1);
            Err(AppError::Unauthorized)
        },
    }
}
