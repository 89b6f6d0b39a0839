use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use bankapi_common::TOKEN_HEADER;

use crate::{auth::gate, error::AppError, AppState};

/// Admit the request only when its token belongs to the account in the path.
///
/// On success the verified id is stored as an `AuthorizedAccount` request
/// extension for the handler.
pub async fn require_account_owner(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorized = gate::authorize(
        &state.tokens,
        state.store.as_ref(),
        request.headers().get(TOKEN_HEADER),
        &raw_id,
    )
    .await?;

    request.extensions_mut().insert(authorized);
    Ok(next.run(request).await)
}
