// ============================================================================
// Relay Core - Bot Adapter
// File: crates/relay-core/src/services/bot_adapter.rs
// ============================================================================
//! Runs inbound activities through the handler and resumes stored
//! conversations for proactive sends.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use relay_security::ChannelAuthenticator;

use crate::clients::BotConnector;
use crate::domain::{Activity, ConversationReference};
use crate::error::DomainError;
use crate::services::{ActivityHandler, TurnContext};

pub const TURN_ERROR_TRACE_NAME: &str = "OnTurnError Trace";
pub const TURN_ERROR_VALUE_TYPE: &str = "https://www.botframework.com/schemas/error";
pub const TURN_ERROR_LABEL: &str = "TurnError";
pub const TURN_ERROR_MESSAGE: &str = "The bot encountered an error or bug.";
pub const TURN_ERROR_FOLLOW_UP: &str = "To continue to run this bot, please fix the bot source code.";

pub struct BotAdapter {
    connector: Arc<dyn BotConnector>,
    authenticator: Arc<dyn ChannelAuthenticator>,
    handler: Arc<dyn ActivityHandler>,
}

impl BotAdapter {
    pub fn new(
        connector: Arc<dyn BotConnector>,
        authenticator: Arc<dyn ChannelAuthenticator>,
        handler: Arc<dyn ActivityHandler>,
    ) -> Self {
        Self {
            connector,
            authenticator,
            handler,
        }
    }

    pub fn continue_conversation(&self, reference: &ConversationReference) -> TurnContext {
        TurnContext::from_reference(reference.clone(), self.connector.clone())
    }

    /// Authenticate and run one inbound activity.
    ///
    /// Only authentication failures and activities that cannot be addressed
    /// are returned as errors. A failing handler is reported into the
    /// conversation and the turn still counts as processed.
    pub async fn process_activity(
        &self,
        authorization: Option<&str>,
        activity: Activity,
    ) -> Result<(), DomainError> {
        self.authenticator
            .authenticate(authorization, activity.service_url.as_deref())
            .await?;

        let ctx = TurnContext::new(activity, self.connector.clone())?;
        info!(
            "Processing {} activity for conversation {}",
            ctx.activity().activity_type,
            ctx.conversation_reference().conversation_id()
        );

        if let Err(err) = self.handler.on_turn(&ctx).await {
            self.on_turn_error(&ctx, &err).await;
        }

        Ok(())
    }

    async fn on_turn_error(&self, ctx: &TurnContext, err: &DomainError) {
        error!("[on_turn_error] unhandled error: {}", err);

        if let Err(e) = ctx
            .send_trace_activity(
                TURN_ERROR_TRACE_NAME,
                Value::String(err.to_string()),
                TURN_ERROR_VALUE_TYPE,
                TURN_ERROR_LABEL,
            )
            .await
        {
            error!("Failed to send turn error trace: {}", e);
        }

        for text in [TURN_ERROR_MESSAGE, TURN_ERROR_FOLLOW_UP] {
            if let Err(e) = ctx.send_text(text).await {
                error!("Failed to report turn error: {}", e);
            }
        }
    }
}
