// ============================================================================
// Relay Core - Token Exchange Service
// File: crates/relay-core/src/services/token_service.rs
// ============================================================================
//! Exchanges a Teams SSO token for a delegated Graph token (on-behalf-of).

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use relay_security::decode_unverified;

use crate::clients::IdentityProvider;
use crate::domain::AccessTokenResult;
use crate::error::DomainError;

pub struct TokenExchangeService {
    provider: Arc<dyn IdentityProvider>,
}

impl TokenExchangeService {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Returns the provider's token payload verbatim on success.
    ///
    /// `ConsentRequired` means the client has to run the interactive consent
    /// (or MFA) flow; any other provider failure is `TokenExchangeFailed`.
    pub async fn exchange(&self, sso_token: &str) -> Result<Value, DomainError> {
        let claims = decode_unverified(sso_token)?;
        info!(
            "Exchanging SSO token for participant {} in tenant {}",
            claims.oid, claims.tid
        );

        let response = self
            .provider
            .exchange_on_behalf_of(&claims.tid, sso_token)
            .await;

        match AccessTokenResult::classify(response) {
            AccessTokenResult::Granted(token) => Ok(token),
            AccessTokenResult::ConsentRequired => {
                info!("User must consent or perform MFA (this also happens with a wrong client id or secret)");
                Err(DomainError::ConsentRequired)
            }
            AccessTokenResult::Failed { status, error } => {
                warn!("Could not exchange access token: status {}, error {:?}", status, error);
                Err(DomainError::TokenExchangeFailed(format!(
                    "provider returned {} ({})",
                    status,
                    error.as_deref().unwrap_or("no error code")
                )))
            }
        }
    }
}
