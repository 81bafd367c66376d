//! Voice echo bot client.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use relay_core::clients::VoiceBotClient;
use relay_core::error::DomainError;

#[derive(Debug, Serialize)]
struct JoinCallRequest<'a> {
    #[serde(rename = "JoinURL")]
    join_url: &'a str,
}

pub struct HttpVoiceBotClient {
    http: Client,
    base_url: String,
}

impl HttpVoiceBotClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn join_call_internal(&self, join_url: &str) -> anyhow::Result<Value> {
        let url = format!("{}/joinCall", self.base_url.trim_end_matches('/'));
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(&JoinCallRequest { join_url })
            .send()
            .await
            .context("Failed to connect to voice bot")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Voice bot returned {}: {}", status, body);
        }

        response
            .json()
            .await
            .context("Voice bot response is not JSON")
    }
}

#[async_trait]
impl VoiceBotClient for HttpVoiceBotClient {
    async fn join_call(&self, join_url: &str) -> Result<Value, DomainError> {
        self.join_call_internal(join_url)
            .await
            .map_err(|e| DomainError::VoiceBotDispatch(format!("{:#}", e)))
    }
}
