// ============================
// bankapi-backend/src/storage/mod.rs
// ============================
//! Storage abstraction over account records, with in-memory and flat-file
//! implementations.
use std::fmt;
use std::ops::RangeInclusive;

use async_trait::async_trait;
use bankapi_common::{Account, AccountId};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

mod flat_file;
mod memory;

pub use flat_file::FlatFileAccountStore;
pub use memory::MemoryAccountStore;

/// Range public account numbers are drawn from
pub const ACCOUNT_NUMBER_RANGE: RangeInclusive<i64> = 100_000_000..=999_999_999;

/// Trait for account storage backends
///
/// Implementations must be safe to call concurrently; they serialize their
/// own writes. No caller holds a lock across these calls.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account, assigning its id and creation time
    async fn create_account(&self, draft: NewAccount) -> Result<AccountRecord, AppError>;

    async fn get_account_by_id(&self, id: AccountId) -> Result<AccountRecord, AppError>;

    /// Lookup by public account number. The returned record carries the
    /// password hash, as login needs it.
    async fn get_account_by_number(&self, number: i64) -> Result<AccountRecord, AppError>;

    /// Hard delete. Deleting an id that does not exist is `NotFound`.
    async fn delete_account(&self, id: AccountId) -> Result<(), AppError>;

    /// All accounts, ordered by id ascending
    async fn get_accounts(&self) -> Result<Vec<AccountRecord>, AppError>;

    /// Placeholder kept for the storage contract. Confirms the account
    /// exists and writes nothing: no field of a stored account (balance
    /// included) is ever changed after creation.
    async fn update_account(&self, account: &AccountRecord) -> Result<(), AppError>;
}

/// Account fields known before the store assigns an id
#[derive(Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub password_hash: String,
}

impl NewAccount {
    /// Draft with a freshly drawn random account number
    pub fn new(first_name: String, last_name: String, password_hash: String) -> Self {
        let number = rand::rng().random_range(ACCOUNT_NUMBER_RANGE);
        Self {
            first_name,
            last_name,
            number,
            password_hash,
        }
    }

    pub(crate) fn into_record(self, id: AccountId, created_at: DateTime<Utc>) -> AccountRecord {
        AccountRecord {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            number: self.number,
            balance: 0,
            password_hash: self.password_hash,
            created_at,
        }
    }
}

/// Stored account, including the password hash
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub balance: i64,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for AccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRecord")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("number", &self.number)
            .field("balance", &self.balance)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        Account {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            number: record.number,
            balance: record.balance,
            created_at: record.created_at,
        }
    }
}

fn not_found_by_id(id: AccountId) -> AppError {
    AppError::NotFound(format!("account {id} not found"))
}

fn not_found_by_number(number: i64) -> AppError {
    AppError::NotFound(format!("account with number {number} not found"))
}

fn duplicate_number(number: i64) -> AppError {
    AppError::DuplicateNumber(number)
}
