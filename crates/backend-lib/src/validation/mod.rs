// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request validation module.

use crate::error::AppError;
use bankapi_common::{AccountId, LoginRequest, TransferRequest};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

// Common validation constants
const MAX_NAME_LENGTH: usize = 255;
pub const MIN_PASSWORD_LENGTH: usize = 8;

// Names may not contain control characters
static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\p{Cc}]+$").expect("name pattern is a valid regex")
});

/// Possible validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },

    #[error("{field} must be at most 255 characters")]
    NameTooLong { field: &'static str },

    #[error("{field} contains invalid characters")]
    InvalidName { field: &'static str },

    #[error("password must be at least 8 characters")]
    PasswordTooShort,

    #[error("invalid account id: {0}")]
    InvalidAccountId(String),

    #[error("exactly one of id or number is required")]
    AmbiguousLogin,

    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("toAccount must be a positive account number")]
    InvalidDestination,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Account lookup key for login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginTarget {
    Id(AccountId),
    Number(i64),
}

/// Validate a display name, returning it trimmed
pub fn validate_name<'a>(field: &'static str, value: &'a str) -> ValidationResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName { field });
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong { field });
    }

    if !NAME_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidName { field });
    }

    Ok(trimmed)
}

/// Validate a new password. The upper bound is enforced by the hasher.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Parse a decimal account id taken from a request path
pub fn parse_account_id(raw: &str) -> ValidationResult<AccountId> {
    raw.parse::<AccountId>()
        .map_err(|_| ValidationError::InvalidAccountId(raw.to_string()))
}

pub fn validate_login(request: &LoginRequest) -> ValidationResult<LoginTarget> {
    match (request.id, request.number) {
        (Some(id), None) => Ok(LoginTarget::Id(id)),
        (None, Some(number)) => Ok(LoginTarget::Number(number)),
        _ => Err(ValidationError::AmbiguousLogin),
    }
}

pub fn validate_transfer(request: &TransferRequest) -> ValidationResult<()> {
    if request.amount <= 0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    if request.to_account <= 0 {
        return Err(ValidationError::InvalidDestination);
    }
    Ok(())
}
