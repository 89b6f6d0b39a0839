//! Demo accounts for `--seed`.
use bankapi_common::{Account, CreateAccountRequest};

use crate::error::AppError;
use crate::service::AccountService;

const SEED_PASSWORD: &str = "admin123";
const SEED_NAMES: [(&str, &str); 3] = [("John", "Doe"), ("Jane", "Doe"), ("John", "Smith")];

/// Register the demo accounts through the normal registration path
pub async fn seed_accounts(service: &AccountService) -> Result<Vec<Account>, AppError> {
    let mut seeded = Vec::with_capacity(SEED_NAMES.len());
    for (first_name, last_name) in SEED_NAMES {
        let (account, _token) = service
            .register(CreateAccountRequest {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                password: SEED_PASSWORD.to_string(),
            })
            .await?;
        tracing::info!(
            id = account.id,
            number = account.number,
            "seeded {} {}",
            account.first_name,
            account.last_name
        );
        seeded.push(account);
    }
    Ok(seeded)
}
