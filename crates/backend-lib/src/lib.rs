// ============================
// bankapi-backend/src/lib.rs
// ============================
//! Core functionality for the account-management API server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod seed;
pub mod service;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::config::{Settings, StorageKind};
use crate::error::AppError;
use crate::service::AccountService;
use crate::storage::{AccountStore, FlatFileAccountStore, MemoryAccountStore};

pub use crate::router::create_router;

/// Application state shared across all handlers
pub struct AppState {
    /// Account orchestration
    pub service: Arc<AccountService>,
    /// Token issuer, shared with the service
    pub tokens: Arc<TokenIssuer>,
    /// Storage backend, used directly by the ownership gate
    pub store: Arc<dyn AccountStore>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state
    pub fn new(store: Arc<dyn AccountStore>, settings: Settings) -> Result<Self, AppError> {
        let tokens = Arc::new(TokenIssuer::from_settings(&settings)?);
        let service = Arc::new(AccountService::new(store.clone(), tokens.clone()));

        Ok(Self {
            service,
            tokens,
            store,
            settings: Arc::new(settings),
        })
    }
}

/// Open the storage backend selected in `settings`
pub async fn open_store(settings: &Settings) -> Result<Arc<dyn AccountStore>, AppError> {
    let store: Arc<dyn AccountStore> = match settings.storage {
        StorageKind::Memory => Arc::new(MemoryAccountStore::new()),
        StorageKind::File => Arc::new(FlatFileAccountStore::open(&settings.data_dir).await?),
    };
    tracing::info!(storage = ?settings.storage, "account store ready");
    Ok(store)
}
