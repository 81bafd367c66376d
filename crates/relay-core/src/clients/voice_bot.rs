//! Companion voice bot service port.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoiceBotClient: Send + Sync {
    /// Ask the voice bot to join the meeting at `join_url`.
    async fn join_call(&self, join_url: &str) -> Result<Value, DomainError>;
}
