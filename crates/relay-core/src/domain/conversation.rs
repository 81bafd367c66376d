// ============================================================================
// Relay Core - Conversation Reference
// File: crates/relay-core/src/domain/conversation.rs
// ============================================================================
//! Conversation reference: the handle needed to send into a conversation the
//! bot has already seen, without a new inbound activity.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::activity::Activity;
use crate::error::DomainError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ChannelAccount>,
    pub bot: ChannelAccount,
    pub conversation: ConversationAccount,
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub service_url: String,
}

impl ConversationReference {
    /// Capture the reference from an inbound activity. The activity's recipient
    /// is the bot and its sender is the user.
    pub fn from_activity(activity: &Activity) -> Result<Self, DomainError> {
        let missing = |field: &str| DomainError::InvalidActivity(format!("activity has no {field}"));

        Ok(Self {
            activity_id: activity.id.clone(),
            user: activity.from.clone(),
            bot: activity.recipient.clone().ok_or_else(|| missing("recipient"))?,
            conversation: activity.conversation.clone().ok_or_else(|| missing("conversation"))?,
            channel_id: activity.channel_id.clone().ok_or_else(|| missing("channelId"))?,
            locale: activity.locale.clone(),
            service_url: activity.service_url.clone().ok_or_else(|| missing("serviceUrl"))?,
        })
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation.id
    }

    /// Address an outgoing activity: from the bot, to the user, in this conversation.
    pub fn apply_to_outgoing(&self, activity: &mut Activity) {
        activity.channel_id = Some(self.channel_id.clone());
        activity.service_url = Some(self.service_url.clone());
        activity.conversation = Some(self.conversation.clone());
        activity.from = Some(self.bot.clone());
        activity.recipient = self.user.clone();
        if activity.locale.is_none() {
            activity.locale = self.locale.clone();
        }
        if activity.reply_to_id.is_none() {
            activity.reply_to_id = self.activity_id.clone();
        }
    }

    /// Rebuild the inbound-shaped activity a resumed turn starts from.
    pub fn continuation_activity(&self) -> Activity {
        Activity {
            activity_type: super::activity::activity_types::EVENT.to_string(),
            name: Some("ContinueConversation".to_string()),
            id: self.activity_id.clone(),
            channel_id: Some(self.channel_id.clone()),
            service_url: Some(self.service_url.clone()),
            conversation: Some(self.conversation.clone()),
            from: self.user.clone(),
            recipient: Some(self.bot.clone()),
            locale: self.locale.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound() -> Activity {
        Activity {
            activity_type: "message".into(),
            id: Some("act-1".into()),
            service_url: Some("https://smba.example.com/".into()),
            channel_id: Some("msteams".into()),
            from: Some(ChannelAccount { id: "29:user".into(), ..Default::default() }),
            recipient: Some(ChannelAccount { id: "28:bot".into(), ..Default::default() }),
            conversation: Some(ConversationAccount { id: "abc123".into(), ..Default::default() }),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_activity_swaps_roles() {
        let reference = ConversationReference::from_activity(&inbound()).unwrap();
        assert_eq!(reference.bot.id, "28:bot");
        assert_eq!(reference.user.as_ref().unwrap().id, "29:user");
        assert_eq!(reference.conversation_id(), "abc123");
        assert_eq!(reference.activity_id.as_deref(), Some("act-1"));
    }

    #[test]
    fn test_from_activity_requires_service_url() {
        let mut activity = inbound();
        activity.service_url = None;
        assert!(matches!(
            ConversationReference::from_activity(&activity),
            Err(DomainError::InvalidActivity(_))
        ));
    }

    #[test]
    fn test_apply_to_outgoing_addresses_user() {
        let reference = ConversationReference::from_activity(&inbound()).unwrap();
        let mut reply = Activity::message("hi");
        reference.apply_to_outgoing(&mut reply);

        assert_eq!(reply.from.as_ref().unwrap().id, "28:bot");
        assert_eq!(reply.recipient.as_ref().unwrap().id, "29:user");
        assert_eq!(reply.conversation_id(), Some("abc123"));
        assert_eq!(reply.reply_to_id.as_deref(), Some("act-1"));
    }

    #[test]
    fn test_continuation_round_trips_reference() {
        let reference = ConversationReference::from_activity(&inbound()).unwrap();
        let continuation = reference.continuation_activity();
        let rebuilt = ConversationReference::from_activity(&continuation).unwrap();
        assert_eq!(rebuilt, reference);
    }
}
