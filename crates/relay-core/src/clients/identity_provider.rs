//! Identity provider port for the OAuth2 on-behalf-of exchange.

use async_trait::async_trait;

use crate::domain::ProviderTokenResponse;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange `assertion` at `tenant_id`'s token endpoint. Never fails:
    /// transport errors come back as [`ProviderTokenResponse::network_failure`].
    async fn exchange_on_behalf_of(&self, tenant_id: &str, assertion: &str) -> ProviderTokenResponse;
}
