// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bankapi_common::ErrorResponse;
use thiserror::Error;

/// Message returned for every gate rejection and token failure
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Message returned for every missing resource; the detail stays in logs
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid request body: {0}")]
    Json(#[from] JsonRejection),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad credentials on login. Never says which part was wrong.
    #[error("Invalid credentials")]
    Authentication,

    /// Valid request shape but the caller may not act on the resource.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Password hashing error: {0}")]
    Hash(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// A freshly drawn account number is already taken.
    #[error("account number {0} already exists")]
    DuplicateNumber(i64),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Json(_) | AppError::Hash(_) => {
                StatusCode::BAD_REQUEST
            },
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Authentication | AppError::Unauthorized | AppError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            },
            AppError::DuplicateNumber(_)
            | AppError::Storage(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable code attached to log lines
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::Json(_) => "VAL_002",
            AppError::NotFound(_) => "NF_001",
            AppError::MethodNotAllowed => "NF_002",
            AppError::Timeout => "REQ_001",
            AppError::DuplicateNumber(_) => "STORE_002",
            AppError::Authentication => "AUTH_001",
            AppError::Unauthorized => "AUTH_002",
            AppError::InvalidToken => "AUTH_003",
            AppError::Hash(_) => "AUTH_004",
            AppError::Storage(_) => "STORE_001",
            AppError::Config(_) => "CFG_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Message safe to hand to the caller
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Json(_) => "Invalid request body".to_string(),
            AppError::NotFound(_) => NOT_FOUND_MESSAGE.to_string(),
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
            AppError::Timeout => "Request timed out".to_string(),
            AppError::Authentication => "Invalid credentials".to_string(),
            AppError::Unauthorized | AppError::InvalidToken => UNAUTHORIZED_MESSAGE.to_string(),
            AppError::Hash(_) => "Password could not be processed".to_string(),
            AppError::DuplicateNumber(_)
            | AppError::Storage(_)
            | AppError::Config(_)
            | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {err}"))
    }
}
