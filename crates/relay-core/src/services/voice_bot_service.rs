//! Dispatches the companion voice bot into a meeting.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::clients::VoiceBotClient;
use crate::error::DomainError;

pub struct VoiceBotService {
    client: Arc<dyn VoiceBotClient>,
}

impl VoiceBotService {
    pub fn new(client: Arc<dyn VoiceBotClient>) -> Self {
        Self { client }
    }

    pub async fn join_meeting(&self, join_url: &str) -> Result<Value, DomainError> {
        if join_url.trim().is_empty() {
            return Err(DomainError::VoiceBotDispatch("join URL is empty".to_string()));
        }

        info!("Asking voice bot to join {}", join_url);
        self.client.join_call(join_url).await.map_err(|e| {
            warn!("Voice bot dispatch failed: {}", e);
            match e {
                DomainError::VoiceBotDispatch(_) => e,
                other => DomainError::VoiceBotDispatch(other.to_string()),
            }
        })
    }
}
