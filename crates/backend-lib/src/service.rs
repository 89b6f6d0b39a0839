// ============================
// bankapi-backend/src/service.rs
// ============================
//! Account orchestration: registration, login, lookup, delete, transfer.
use std::sync::Arc;

use bankapi_common::{Account, AccountId, CreateAccountRequest, LoginRequest, TransferRequest};
use metrics::counter;
use zeroize::Zeroize;

use crate::auth::{hash_password_secure, verify_against_dummy, verify_password, TokenIssuer};
use crate::error::AppError;
use crate::metrics::{
    ACCOUNT_CREATED, ACCOUNT_DELETED, LOGIN_FAILURE, LOGIN_SUCCESS, TRANSFER_RECEIVED,
};
use crate::storage::{AccountStore, NewAccount};
use crate::validation::{self, LoginTarget};

/// Draws of a fresh account number before registration gives up
const NUMBER_DRAW_ATTEMPTS: usize = 5;

pub struct AccountService {
    store: Arc<dyn AccountStore>,
    tokens: Arc<TokenIssuer>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, tokens: Arc<TokenIssuer>) -> Self {
        Self { store, tokens }
    }

    /// Create an account and a token for it.
    ///
    /// Steps run in order hash → persist → issue; a failure at any step
    /// stops the later ones.
    #[tracing::instrument(skip_all)]
    pub async fn register(
        &self,
        request: CreateAccountRequest,
    ) -> Result<(Account, String), AppError> {
        let CreateAccountRequest {
            first_name,
            last_name,
            mut password,
        } = request;

        let first_name = validation::validate_name("firstName", &first_name)?.to_string();
        let last_name = validation::validate_name("lastName", &last_name)?.to_string();
        if let Err(e) = validation::validate_password(&password) {
            password.zeroize();
            return Err(e.into());
        }

        // argon2 is deliberately slow; keep it off the async workers
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password_secure(&mut password)).await??;

        let mut attempt = 1;
        let record = loop {
            let draft =
                NewAccount::new(first_name.clone(), last_name.clone(), password_hash.clone());
            match self.store.create_account(draft).await {
                Err(AppError::DuplicateNumber(number)) if attempt < NUMBER_DRAW_ATTEMPTS => {
                    tracing::debug!(number, attempt, "account number taken, redrawing");
                    attempt += 1;
                },
                result => break result?,
            }
        };
        let token = self.tokens.issue(record.id)?;

        counter!(ACCOUNT_CREATED).increment(1);
        tracing::info!(account_id = record.id, number = record.number, "account created");
        Ok((record.into(), token))
    }

    /// Exchange credentials for a token.
    ///
    /// An unknown account and a wrong password both yield
    /// `AppError::Authentication`.
    #[tracing::instrument(skip_all, fields(id = ?request.id, number = ?request.number))]
    pub async fn login(&self, request: LoginRequest) -> Result<String, AppError> {
        let target = validation::validate_login(&request)?;
        let mut password = request.password;

        let lookup = match target {
            LoginTarget::Id(id) => self.store.get_account_by_id(id).await,
            LoginTarget::Number(number) => self.store.get_account_by_number(number).await,
        };
        let record = match lookup {
            Ok(record) => record,
            Err(AppError::NotFound(_)) => {
                // same argon2 cost as a wrong password
                tokio::task::spawn_blocking(move || {
                    verify_against_dummy(&password);
                    password.zeroize();
                })
                .await?;
                counter!(LOGIN_FAILURE).increment(1);
                tracing::info!("login for unknown account");
                return Err(AppError::Authentication);
            },
            Err(e) => {
                password.zeroize();
                return Err(e);
            },
        };

        let hash = record.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || {
            let result = verify_password(&hash, &password);
            password.zeroize();
            result
        })
        .await?
        .map_err(|e| {
            AppError::Internal(format!("stored hash for account {} unusable: {e}", record.id))
        })?;

        if !matches {
            counter!(LOGIN_FAILURE).increment(1);
            tracing::info!(account_id = record.id, "login with wrong password");
            return Err(AppError::Authentication);
        }

        counter!(LOGIN_SUCCESS).increment(1);
        self.tokens.issue(record.id)
    }

    pub async fn get_account(&self, id: AccountId) -> Result<Account, AppError> {
        Ok(self.store.get_account_by_id(id).await?.into())
    }

    /// All accounts, ordered by id
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        let records = self.store.get_accounts().await?;
        Ok(records.into_iter().map(Account::from).collect())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_account(&self, id: AccountId) -> Result<AccountId, AppError> {
        self.store.delete_account(id).await?;
        counter!(ACCOUNT_DELETED).increment(1);
        tracing::info!(account_id = id, "account deleted");
        Ok(id)
    }

    /// Validate a transfer request and hand it back.
    ///
    /// No balance is read or written: moving funds is not implemented.
    #[tracing::instrument(skip(self))]
    pub async fn transfer(&self, request: TransferRequest) -> Result<TransferRequest, AppError> {
        validation::validate_transfer(&request)?;
        counter!(TRANSFER_RECEIVED).increment(1);
        tracing::info!(
            to_account = request.to_account,
            amount = request.amount,
            "transfer accepted without moving funds"
        );
        Ok(request)
    }
}
