// ============================================================================
// Relay Infrastructure - AAD on-behalf-of client
// File: crates/relay-infrastructure/src/http/identity_provider.rs
// ============================================================================

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use relay_core::clients::IdentityProvider;
use relay_core::domain::ProviderTokenResponse;
use relay_shared::AppConfig;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

pub struct AadIdentityProvider {
    http: Client,
    authority: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl AadIdentityProvider {
    pub fn new(
        http: Client,
        authority: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            http,
            authority: authority.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: scope.into(),
        }
    }

    pub fn from_config(http: Client, config: &AppConfig) -> Self {
        Self::new(
            http,
            config.login_authority.clone(),
            config.m365_client_id.clone(),
            config.m365_client_secret.clone(),
            config.graph_scope(),
        )
    }

    fn token_endpoint(&self, tenant_id: &str) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority.trim_end_matches('/'),
            urlencoding::encode(tenant_id)
        )
    }
}

#[async_trait]
impl IdentityProvider for AadIdentityProvider {
    async fn exchange_on_behalf_of(&self, tenant_id: &str, assertion: &str) -> ProviderTokenResponse {
        let endpoint = self.token_endpoint(tenant_id);
        let params = [
            ("grant_type", JWT_BEARER_GRANT),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("assertion", assertion),
            ("scope", self.scope.as_str()),
            ("requested_token_use", "on_behalf_of"),
        ];

        debug!("POST {}", endpoint);
        let response = match self
            .http
            .post(&endpoint)
            .header(ACCEPT, "application/json")
            .form(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Token endpoint unreachable: {}", e);
                return ProviderTokenResponse::network_failure();
            }
        };

        let status = response.status();
        match response.json::<Value>().await {
            Ok(body) => ProviderTokenResponse {
                status: status.as_u16(),
                body,
            },
            Err(e) => {
                warn!("Token endpoint returned {} with an unreadable body: {}", status, e);
                // A 2xx without a token payload is still a failed exchange.
                let status = if status.is_success() { 502 } else { status.as_u16() };
                ProviderTokenResponse {
                    status,
                    body: json!({ "code": status, "message": "Invalid token response" }),
                }
            }
        }
    }
}
