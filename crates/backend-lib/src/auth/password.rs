// ============================
// bankapi-backend/src/auth/password.rs
// ============================
//! Password hashing and verification.
use std::sync::LazyLock;

use argon2::{
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use password_hash::rand_core::OsRng;
use zeroize::Zeroize;

use crate::error::AppError;

/// Longest password accepted by `hash_password`, in bytes
pub const MAX_PASSWORD_BYTES: usize = 256;

/// Hash a password using argon2id with a random salt
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    if plain.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::Hash(format!(
            "password exceeds {MAX_PASSWORD_BYTES} bytes"
        )));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AppError::Hash(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a hash
///
/// A mismatch is `Ok(false)`. Only an unparsable hash is an error.
pub fn verify_password(hash: &str, plain: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Hash(format!("malformed hash: {e}")))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(AppError::Hash(e.to_string())),
    }
}

// Stand-in hash verified when the account does not exist, so that path
// costs as much as a real wrong-password check
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("no-such-account-placeholder").ok());

/// Run a full verify against a throwaway hash. Always `false`.
pub fn verify_against_dummy(plain: &str) -> bool {
    let Some(hash) = DUMMY_HASH.as_deref() else {
        return false;
    };
    let _ = verify_password(hash, plain);
    false
}

/// Hash a password and zeroize the original
pub fn hash_password_secure(plain: &mut String) -> Result<String, AppError> {
    let hash = hash_password(plain);
    plain.zeroize();
    hash
}
