//! In-memory account store.
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use bankapi_common::AccountId;
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::{
    duplicate_number, not_found_by_id, not_found_by_number, AccountRecord, AccountStore,
    NewAccount,
};
use crate::error::AppError;

/// Account table shared by the in-memory and flat-file stores.
/// Ids come from a counter and are never reused, even after deletes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "StoredTable", into = "StoredTable")]
pub(crate) struct AccountTable {
    last_id: AccountId,
    accounts: BTreeMap<AccountId, AccountRecord>,
    /// account number -> id, rebuilt on load
    numbers: HashMap<i64, AccountId>,
}

/// On-disk shape of `AccountTable`, without the number index
#[derive(Serialize, Deserialize)]
struct StoredTable {
    last_id: AccountId,
    accounts: BTreeMap<AccountId, AccountRecord>,
}

impl From<StoredTable> for AccountTable {
    fn from(stored: StoredTable) -> Self {
        let numbers = stored
            .accounts
            .values()
            .map(|a| (a.number, a.id))
            .collect();
        Self {
            last_id: stored.last_id,
            accounts: stored.accounts,
            numbers,
        }
    }
}

impl From<AccountTable> for StoredTable {
    fn from(table: AccountTable) -> Self {
        Self {
            last_id: table.last_id,
            accounts: table.accounts,
        }
    }
}

impl AccountTable {
    pub(crate) fn insert(&mut self, draft: NewAccount) -> Result<AccountRecord, AppError> {
        if self.numbers.contains_key(&draft.number) {
            return Err(duplicate_number(draft.number));
        }

        let id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| AppError::Storage("account id space exhausted".into()))?;
        let record = draft.into_record(id, Utc::now());
        self.last_id = id;
        self.numbers.insert(record.number, id);
        self.accounts.insert(id, record.clone());
        Ok(record)
    }

    pub(crate) fn get(&self, id: AccountId) -> Result<AccountRecord, AppError> {
        self.accounts.get(&id).cloned().ok_or_else(|| not_found_by_id(id))
    }

    pub(crate) fn get_by_number(&self, number: i64) -> Result<AccountRecord, AppError> {
        self.numbers
            .get(&number)
            .and_then(|id| self.accounts.get(id))
            .cloned()
            .ok_or_else(|| not_found_by_number(number))
    }

    pub(crate) fn remove(&mut self, id: AccountId) -> Result<(), AppError> {
        let record = self.accounts.remove(&id).ok_or_else(|| not_found_by_id(id))?;
        self.numbers.remove(&record.number);
        Ok(())
    }

    pub(crate) fn list(&self) -> Vec<AccountRecord> {
        // BTreeMap iterates in key order, i.e. by id ascending
        self.accounts.values().cloned().collect()
    }
}

/// Volatile store, used for tests and `storage = "memory"`
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    table: RwLock<AccountTable>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create_account(&self, draft: NewAccount) -> Result<AccountRecord, AppError> {
        self.table.write().insert(draft)
    }

    async fn get_account_by_id(&self, id: AccountId) -> Result<AccountRecord, AppError> {
        self.table.read().get(id)
    }

    async fn get_account_by_number(&self, number: i64) -> Result<AccountRecord, AppError> {
        self.table.read().get_by_number(number)
    }

    async fn delete_account(&self, id: AccountId) -> Result<(), AppError> {
        self.table.write().remove(id)
    }

    async fn get_accounts(&self) -> Result<Vec<AccountRecord>, AppError> {
        Ok(self.table.read().list())
    }

    async fn update_account(&self, account: &AccountRecord) -> Result<(), AppError> {
        self.table.read().get(account.id).map(|_| ())
    }
}
