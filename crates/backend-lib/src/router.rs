// ============================
// bankapi-backend/src/router.rs
// ============================
//! HTTP router.
use std::sync::Arc;

use axum::{
    error_handling::HandleErrorLayer,
    http::HeaderName,
    middleware,
    routing::{get, post},
    BoxError, Router,
};
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use bankapi_common::TOKEN_HEADER;

use crate::error::AppError;
use crate::handlers::{self, accounts};
use crate::middleware::require_account_owner;
use crate::AppState;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let timeout = state.settings.request_timeout();

    // Routes addressing one account go through the ownership gate
    let owned = Router::new()
        .route(
            "/account/{id}",
            get(accounts::get_account).delete(accounts::delete_account),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_account_owner,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(TOKEN_HEADER)]);

    Router::new()
        .route(
            "/account",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route("/login", post(accounts::login))
        .route("/transfer", post(accounts::transfer))
        .route("/health", get(accounts::health))
        .merge(owned)
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_layer_error))
                .layer(TimeoutLayer::new(timeout)),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Turn errors raised by tower layers into the JSON error envelope
async fn handle_layer_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("request timed out");
        AppError::Timeout
    } else {
        AppError::Internal(format!("unhandled layer error: {err}"))
    }
}
