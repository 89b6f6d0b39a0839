// ============================
// bankapi-backend/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod gate;
pub mod password;
pub mod token;

pub use gate::{authorize, AuthorizedAccount, GateOutcome, RejectReason};
pub use password::{
    hash_password, hash_password_secure, verify_against_dummy, verify_password,
    MAX_PASSWORD_BYTES,
};
pub use token::{Claims, TokenIssuer};
