// ============================================================================
// Relay Infrastructure - Bot Connector client
// File: crates/relay-infrastructure/src/http/bot_connector.rs
// ============================================================================
//! REST client for the Bot Connector service and the Teams meeting APIs.
//!
//! Outgoing calls carry a bot token from the client-credentials grant against
//! the Bot Framework tenant. The token is cached until shortly before it
//! expires. Without a bot id (emulator runs) no token is attached.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use relay_core::clients::BotConnector;
use relay_core::domain::Activity;
use relay_core::error::DomainError;
use relay_shared::constants::{BOT_FRAMEWORK_SCOPE, BOT_FRAMEWORK_TENANT};
use relay_shared::AppConfig;

const TOKEN_REFRESH_MARGIN_MINUTES: i64 = 5;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct ResourceResponse {
    #[serde(default)]
    id: Option<String>,
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

struct BotCredentials {
    app_id: String,
    app_password: String,
    token_endpoint: String,
}

pub struct HttpBotConnector {
    http: Client,
    credentials: Option<BotCredentials>,
    token: RwLock<Option<CachedToken>>,
}

impl HttpBotConnector {
    /// An empty `app_id` disables outgoing authentication.
    pub fn new(
        http: Client,
        login_authority: &str,
        app_id: impl Into<String>,
        app_password: impl Into<String>,
    ) -> Self {
        let app_id = app_id.into();
        let credentials = (!app_id.is_empty()).then(|| BotCredentials {
            app_id,
            app_password: app_password.into(),
            token_endpoint: format!(
                "{}/{}/oauth2/v2.0/token",
                login_authority.trim_end_matches('/'),
                BOT_FRAMEWORK_TENANT
            ),
        });

        Self {
            http,
            credentials,
            token: RwLock::new(None),
        }
    }

    pub fn from_config(http: Client, config: &AppConfig) -> Self {
        Self::new(
            http,
            &config.login_authority,
            config.bot_id.clone(),
            config.bot_password.clone(),
        )
    }

    async fn bot_token(&self) -> anyhow::Result<Option<String>> {
        let Some(credentials) = &self.credentials else {
            return Ok(None);
        };

        let fresh_until = Utc::now() + Duration::minutes(TOKEN_REFRESH_MARGIN_MINUTES);
        if let Some(cached) = self.token.read().await.as_ref() {
            if cached.expires_at > fresh_until {
                return Ok(Some(cached.access_token.clone()));
            }
        }

        let mut slot = self.token.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(cached) = slot.as_ref() {
            if cached.expires_at > fresh_until {
                return Ok(Some(cached.access_token.clone()));
            }
        }

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.app_id.as_str()),
            ("client_secret", credentials.app_password.as_str()),
            ("scope", BOT_FRAMEWORK_SCOPE),
        ];
        let token: TokenResponse = self
            .http
            .post(&credentials.token_endpoint)
            .form(&params)
            .send()
            .await
            .context("Failed to reach bot token endpoint")?
            .error_for_status()
            .context("Bot token request rejected")?
            .json()
            .await
            .context("Bot token response is not valid")?;

        info!("Acquired bot token, expires in {}s", token.expires_in);
        let access_token = token.access_token.clone();
        *slot = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        });
        Ok(Some(access_token))
    }

    async fn authorized(&self, request: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(match self.bot_token().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn get_json(&self, request: RequestBuilder) -> anyhow::Result<Value> {
        let response = self
            .authorized(request)
            .await?
            .send()
            .await
            .context("Failed to reach Bot Connector")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Bot Connector returned {}: {}", status, body);
        }

        response.json().await.context("Bot Connector response is not JSON")
    }

    async fn send_activity_internal(&self, activity: &Activity) -> anyhow::Result<Option<String>> {
        let service_url = activity
            .service_url
            .as_deref()
            .context("activity has no serviceUrl")?;
        let conversation_id = activity
            .conversation_id()
            .context("activity has no conversation")?;

        let mut url = format!(
            "{}/v3/conversations/{}/activities",
            service_url.trim_end_matches('/'),
            urlencoding::encode(conversation_id)
        );
        if let Some(reply_to_id) = activity.reply_to_id.as_deref() {
            url.push('/');
            url.push_str(&urlencoding::encode(reply_to_id));
        }

        debug!("POST {}", url);
        let response = self
            .authorized(self.http.post(&url).json(activity))
            .await?
            .send()
            .await
            .context("Failed to reach Bot Connector")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Bot Connector returned {}: {}", status, body);
        }

        // Some channels answer with an empty body.
        let text = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str::<ResourceResponse>(&text)
            .ok()
            .and_then(|r| r.id))
    }
}

#[async_trait]
impl BotConnector for HttpBotConnector {
    async fn send_activity(&self, activity: &Activity) -> Result<Option<String>, DomainError> {
        self.send_activity_internal(activity)
            .await
            .map_err(|e| DomainError::Connector(format!("{:#}", e)))
    }

    async fn get_meeting_info(&self, service_url: &str, meeting_id: &str) -> Result<Value, DomainError> {
        let url = format!(
            "{}/v1/meetings/{}",
            service_url.trim_end_matches('/'),
            urlencoding::encode(meeting_id)
        );
        debug!("GET {}", url);

        self.get_json(self.http.get(&url))
            .await
            .map_err(|e| DomainError::Connector(format!("{:#}", e)))
    }

    async fn get_meeting_participant(
        &self,
        service_url: &str,
        meeting_id: &str,
        participant_id: &str,
        tenant_id: &str,
    ) -> Result<Value, DomainError> {
        let url = format!(
            "{}/v1/meetings/{}/participants/{}",
            service_url.trim_end_matches('/'),
            urlencoding::encode(meeting_id),
            urlencoding::encode(participant_id)
        );
        debug!("GET {}", url);

        self.get_json(self.http.get(&url).query(&[("tenantId", tenant_id)]))
            .await
            .map_err(|e| DomainError::Connector(format!("{:#}", e)))
    }
}
