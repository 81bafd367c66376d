//! Inbound activity handling.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::activity_types;
use crate::error::DomainError;
use crate::repositories::ConversationStore;
use crate::services::TurnContext;

#[async_trait]
pub trait ActivityHandler: Send + Sync {
    async fn on_turn(&self, ctx: &TurnContext) -> Result<(), DomainError>;
}

/// Remembers every conversation the bot sees so later HTTP requests can resume it.
pub struct ConversationCaptureHandler {
    store: Arc<dyn ConversationStore>,
}

impl ConversationCaptureHandler {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ActivityHandler for ConversationCaptureHandler {
    async fn on_turn(&self, ctx: &TurnContext) -> Result<(), DomainError> {
        let reference = ctx.conversation_reference();
        self.store
            .put(reference.conversation_id(), reference.clone())
            .await?;
        debug!("Stored conversation reference for {}", reference.conversation_id());

        let activity = ctx.activity();
        match activity.activity_type.as_str() {
            activity_types::MESSAGE => {
                info!(
                    "Message in {}: {}",
                    reference.conversation_id(),
                    activity.text.as_deref().unwrap_or_default()
                );
            }
            activity_types::CONVERSATION_UPDATE => {
                let added = activity
                    .extra
                    .get("membersAdded")
                    .and_then(|m| m.as_array())
                    .map_or(0, Vec::len);
                info!(
                    "Conversation update in {} ({} members added)",
                    reference.conversation_id(),
                    added
                );
            }
            other => debug!("Ignoring {} activity", other),
        }

        Ok(())
    }
}
