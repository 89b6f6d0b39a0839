// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const ACCOUNT_CREATED: &str = "account.created";
pub const ACCOUNT_DELETED: &str = "account.deleted";
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const GATE_REJECTED: &str = "auth.gate.rejected";
pub const TRANSFER_RECEIVED: &str = "transfer.received";
