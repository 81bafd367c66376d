// ============================================================================
// Relay Core - Turn Context
// File: crates/relay-core/src/services/turn_context.rs
// ============================================================================
//! Per-turn handle: the activity being processed plus the means to reply
//! into its conversation.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use relay_shared::constants::EMULATOR_CHANNEL_ID;

use crate::clients::BotConnector;
use crate::domain::{activity_types, Activity, ConversationReference};
use crate::error::DomainError;

pub struct TurnContext {
    activity: Activity,
    reference: ConversationReference,
    connector: Arc<dyn BotConnector>,
}

impl TurnContext {
    /// Start a turn for an inbound activity.
    pub fn new(activity: Activity, connector: Arc<dyn BotConnector>) -> Result<Self, DomainError> {
        let reference = ConversationReference::from_activity(&activity)?;
        Ok(Self {
            activity,
            reference,
            connector,
        })
    }

    /// Resume a conversation from a stored reference.
    pub fn from_reference(reference: ConversationReference, connector: Arc<dyn BotConnector>) -> Self {
        Self {
            activity: reference.continuation_activity(),
            reference,
            connector,
        }
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn conversation_reference(&self) -> &ConversationReference {
        &self.reference
    }

    /// Address `activity` to this conversation and post it.
    ///
    /// Trace activities are only delivered on the emulator channel; elsewhere
    /// they are dropped and `Ok(None)` is returned.
    pub async fn send_activity(&self, mut activity: Activity) -> Result<Option<String>, DomainError> {
        self.reference.apply_to_outgoing(&mut activity);

        if activity.is_type(activity_types::TRACE) && self.reference.channel_id != EMULATOR_CHANNEL_ID {
            debug!(
                "Dropping trace activity on channel {}",
                self.reference.channel_id
            );
            return Ok(None);
        }

        self.connector.send_activity(&activity).await
    }

    pub async fn send_text(&self, text: &str) -> Result<Option<String>, DomainError> {
        self.send_activity(Activity::message(text)).await
    }

    pub async fn send_trace_activity(
        &self,
        name: &str,
        value: Value,
        value_type: &str,
        label: &str,
    ) -> Result<Option<String>, DomainError> {
        self.send_activity(Activity::trace(name, value, value_type, label))
            .await
    }

    pub async fn meeting_info(&self, meeting_id: &str) -> Result<Value, DomainError> {
        self.connector
            .get_meeting_info(&self.reference.service_url, meeting_id)
            .await
    }

    pub async fn meeting_participant(
        &self,
        meeting_id: &str,
        participant_id: &str,
        tenant_id: &str,
    ) -> Result<Value, DomainError> {
        self.connector
            .get_meeting_participant(&self.reference.service_url, meeting_id, participant_id, tenant_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{inbound_activity, RecordingConnector};

    #[tokio::test]
    async fn test_send_text_is_addressed_to_conversation() {
        let connector = Arc::new(RecordingConnector::default());
        let ctx = TurnContext::new(inbound_activity("msteams", "conv-1"), connector.clone()).unwrap();

        ctx.send_text("hello").await.unwrap();

        let sent = connector.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].conversation_id(), Some("conv-1"));
        assert_eq!(sent[0].text.as_deref(), Some("hello"));
        assert_eq!(sent[0].from.as_ref().unwrap().id, "28:bot");
    }

    #[tokio::test]
    async fn test_trace_dropped_outside_emulator() {
        let connector = Arc::new(RecordingConnector::default());
        let ctx = TurnContext::new(inbound_activity("msteams", "conv-1"), connector.clone()).unwrap();

        let id = ctx
            .send_trace_activity("t", Value::Null, "type", "label")
            .await
            .unwrap();
        assert!(id.is_none());
        assert!(connector.sent().is_empty());
    }

    #[tokio::test]
    async fn test_trace_delivered_on_emulator() {
        let connector = Arc::new(RecordingConnector::default());
        let ctx = TurnContext::new(inbound_activity("emulator", "conv-1"), connector.clone()).unwrap();

        ctx.send_trace_activity("t", Value::Null, "type", "label")
            .await
            .unwrap();
        assert_eq!(connector.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_meeting_queries_use_reference_service_url() {
        let connector = Arc::new(RecordingConnector::default());
        let reference =
            ConversationReference::from_activity(&inbound_activity("msteams", "conv-1")).unwrap();
        let ctx = TurnContext::from_reference(reference, connector.clone());

        ctx.meeting_info("m-1").await.unwrap();
        ctx.meeting_participant("m-1", "oid-1", "tid-1").await.unwrap();

        assert_eq!(
            connector.queries(),
            vec![
                "info https://smba.example.com/ m-1".to_string(),
                "participant https://smba.example.com/ m-1 oid-1 tid-1".to_string(),
            ]
        );
    }
}
