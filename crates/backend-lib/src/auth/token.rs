// ============================
// bankapi-backend/src/auth/token.rs
// ============================
//! Signed bearer tokens (HS256 JWT) asserting an account identity.
use std::fmt;
use std::time::Duration;

use bankapi_common::AccountId;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::AppError;

/// Largest integer an IEEE double represents exactly
const MAX_EXACT_FLOAT_ID: f64 = 9_007_199_254_740_992.0;

/// Claims written into issued tokens
#[derive(Debug, Clone, Serialize)]
pub struct Claims {
    pub account_id: AccountId,
    pub iat: i64,
    pub exp: i64,
}

/// Claims as read back from a token. The id stays an untyped number until
/// `coerce_account_id` has checked it.
#[derive(Debug, Deserialize)]
struct DecodedClaims {
    account_id: serde_json::Number,
}

/// Issues and validates bearer tokens with a secret injected at startup
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, AppError> {
        if secret.trim().is_empty() {
            return Err(AppError::Config("token signing secret is empty".into()));
        }
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|_| AppError::Config("token ttl out of range".into()))?;

        // Only HS256 is accepted; a token announcing any other algorithm fails.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let secret = settings
            .jwt_secret
            .as_deref()
            .ok_or_else(|| AppError::Config("token signing secret is not configured".into()))?;
        Self::new(secret, settings.token_ttl())
    }

    /// Issue a token for `account_id` expiring one TTL from now
    pub fn issue(&self, account_id: AccountId) -> Result<String, AppError> {
        let now = Utc::now();
        self.sign(account_id, now, now + self.ttl)
    }

    #[cfg(test)]
    pub(crate) fn issue_expiring_at(
        &self,
        account_id: AccountId,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        self.sign(account_id, Utc::now(), expires_at)
    }

    fn sign(
        &self,
        account_id: AccountId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            account_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))
    }

    /// Check signature, algorithm and expiry, then return the account id
    pub fn validate(&self, token: &str) -> Result<AccountId, AppError> {
        let data = jsonwebtoken::decode::<DecodedClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "token rejected");
                AppError::InvalidToken
            })?;

        coerce_account_id(&data.claims.account_id).ok_or_else(|| {
            tracing::debug!(claim = %data.claims.account_id, "token carries unusable account id");
            AppError::InvalidToken
        })
    }
}

/// Accept positive integers, including integral floats within the exactly
/// representable range.
fn coerce_account_id(raw: &serde_json::Number) -> Option<AccountId> {
    let id = if let Some(id) = raw.as_i64() {
        id
    } else if raw.is_u64() {
        return None;
    } else {
        let f = raw.as_f64()?;
        if f.fract() != 0.0 || !(1.0..=MAX_EXACT_FLOAT_ID).contains(&f) {
            return None;
        }
        f as AccountId
    };
    (id > 0).then_some(id)
}
