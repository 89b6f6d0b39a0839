// =========================
// tests/unit/error_tests.rs
// =========================
//! Unit tests for the error module
use axum::{http::StatusCode, response::IntoResponse};
use bankapi_backend::error::AppError;
use http_body_util::BodyExt;
use serde_json::{json, Value};

async fn render(err: AppError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_oversized_password_is_a_client_error() {
    let (status, body) = render(AppError::Hash("password exceeds 256 bytes".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Password could not be processed" }));
}

#[tokio::test]
async fn test_internal_details_never_reach_the_body() {
    for err in [
        AppError::Storage("/var/lib/bank/accounts.json: permission denied".into()),
        AppError::Config("JWT_SECRET missing".into()),
        AppError::Internal("stored hash unusable".into()),
    ] {
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }
}

#[tokio::test]
async fn test_token_failures_share_one_message() {
    let (_, invalid) = render(AppError::InvalidToken).await;
    let (_, unauthorized) = render(AppError::Unauthorized).await;
    assert_eq!(invalid, unauthorized);
    assert_eq!(invalid, json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn test_validation_message_is_passed_through() {
    let (status, body) = render(AppError::Validation("amount must be positive".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "amount must be positive");
}

#[tokio::test]
async fn test_not_found_does_not_echo_the_lookup() {
    for err in [
        AppError::NotFound("account 5 not found".into()),
        AppError::NotFound("account with number 123456789 not found".into()),
    ] {
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Resource not found" }));
    }
}
