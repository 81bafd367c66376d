// ============================================================================
// Relay Core - Meeting Service
// File: crates/relay-core/src/services/meeting_service.rs
// ============================================================================
//! Meeting queries and in-meeting notifications for conversations the bot has
//! already seen.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use relay_shared::constants::TEAMS_BUBBLE_BASE;
use relay_shared::AppConfig;

use crate::domain::{Activity, IdentityClaims};
use crate::error::DomainError;
use crate::repositories::ConversationStore;
use crate::services::{BotAdapter, TurnContext};

pub const IN_MEETING_DIALOG_TEXT: &str = "In-meeting dialog sent";

/// Notification that pops the dialog tab inside a live meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMeetingDialog {
    external_resource_url: String,
}

impl InMeetingDialog {
    pub fn new(
        teams_app_id: &str,
        teamsfx_endpoint: &str,
        bot_id: &str,
        width: u32,
        height: u32,
        title: &str,
    ) -> Self {
        let dialog_url = format!("{}/dialog", teamsfx_endpoint.trim_end_matches('/'));
        let external_resource_url = format!(
            "{}{}?url={}&height={}&width={}&title={}&completionBotId={}",
            TEAMS_BUBBLE_BASE,
            teams_app_id,
            urlencoding::encode(&dialog_url),
            height,
            width,
            urlencoding::encode(title),
            bot_id
        );
        Self {
            external_resource_url,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.teams_app_id,
            &config.teamsfx_endpoint,
            &config.bot_id,
            config.dialog_width,
            config.dialog_height,
            &config.dialog_title,
        )
    }

    pub fn external_resource_url(&self) -> &str {
        &self.external_resource_url
    }

    pub fn notification_activity(&self) -> Activity {
        Activity::message(IN_MEETING_DIALOG_TEXT).with_channel_data(json!({
            "notification": {
                "alertInMeeting": true,
                "externalResourceUrl": self.external_resource_url,
            }
        }))
    }
}

pub struct MeetingService {
    store: Arc<dyn ConversationStore>,
    adapter: Arc<BotAdapter>,
    dialog: InMeetingDialog,
}

impl MeetingService {
    pub fn new(store: Arc<dyn ConversationStore>, adapter: Arc<BotAdapter>, dialog: InMeetingDialog) -> Self {
        Self {
            store,
            adapter,
            dialog,
        }
    }

    async fn resume(&self, conversation_id: &str) -> Result<TurnContext, DomainError> {
        let reference = self
            .store
            .get(conversation_id)
            .await?
            .ok_or_else(|| {
                warn!("No conversation reference for {}", conversation_id);
                DomainError::ConversationNotFound(conversation_id.to_string())
            })?;
        Ok(self.adapter.continue_conversation(&reference))
    }

    /// The `details` member of the meeting info, or `null` when absent.
    pub async fn meeting_details(&self, conversation_id: &str, meeting_id: &str) -> Result<Value, DomainError> {
        let ctx = self.resume(conversation_id).await?;
        let info = ctx
            .meeting_info(meeting_id)
            .await
            .map_err(|e| DomainError::MeetingQuery(e.to_string()))?;
        info!("Got meeting info for {}", meeting_id);

        Ok(info.get("details").cloned().unwrap_or(Value::Null))
    }

    pub async fn participant_info(
        &self,
        conversation_id: &str,
        meeting_id: &str,
        claims: &IdentityClaims,
    ) -> Result<Value, DomainError> {
        let ctx = self.resume(conversation_id).await?;
        ctx.meeting_participant(meeting_id, &claims.oid, &claims.tid)
            .await
            .map_err(|e| DomainError::MeetingQuery(e.to_string()))
    }

    /// Looks the conversation up before returning; the send itself runs
    /// detached and only logs its outcome.
    pub async fn send_in_meeting_dialog(&self, conversation_id: &str) -> Result<JoinHandle<()>, DomainError> {
        let ctx = self.resume(conversation_id).await?;
        let activity = self.dialog.notification_activity();
        let conversation_id = conversation_id.to_string();

        Ok(tokio::spawn(async move {
            match ctx.send_activity(activity).await {
                Ok(id) => info!("In-meeting dialog sent to {} ({:?})", conversation_id, id),
                Err(e) => error!("Failed to send in-meeting dialog to {}: {}", conversation_id, e),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConversationReference;
    use crate::repositories::MockConversationStore;
    use crate::services::testing::{inbound_activity, RecordingConnector};
    use crate::services::ConversationCaptureHandler;
    use relay_security::AnonymousChannelAuthenticator;

    fn dialog() -> InMeetingDialog {
        InMeetingDialog::new("app-1", "https://tab.example.com", "bot-1", 280, 180, "Test in-meeting dialog")
    }

    fn service(connector: Arc<RecordingConnector>, stored: Option<&str>) -> MeetingService {
        let reference = stored.map(|id| {
            ConversationReference::from_activity(&inbound_activity("msteams", id)).unwrap()
        });
        let mut store = MockConversationStore::new();
        store.expect_get().returning(move |id| {
            Ok(reference.clone().filter(|r| r.conversation_id() == id))
        });
        let store: Arc<dyn ConversationStore> = Arc::new(store);

        let adapter = Arc::new(BotAdapter::new(
            connector,
            Arc::new(AnonymousChannelAuthenticator),
            Arc::new(ConversationCaptureHandler::new(store.clone())),
        ));
        MeetingService::new(store, adapter, dialog())
    }

    #[test]
    fn test_external_resource_url() {
        assert_eq!(
            dialog().external_resource_url(),
            "https://teams.microsoft.com/l/bubble/app-1?url=https%3A%2F%2Ftab.example.com%2Fdialog\
             &height=180&width=280&title=Test%20in-meeting%20dialog&completionBotId=bot-1"
        );
    }

    #[test]
    fn test_notification_payload() {
        let activity = dialog().notification_activity();
        assert_eq!(activity.text.as_deref(), Some(IN_MEETING_DIALOG_TEXT));
        let notification = &activity.channel_data.unwrap()["notification"];
        assert_eq!(notification["alertInMeeting"], json!(true));
        assert_eq!(
            notification["externalResourceUrl"],
            json!(dialog().external_resource_url())
        );
    }

    #[tokio::test]
    async fn test_meeting_details_uses_stored_reference() {
        let connector = Arc::new(RecordingConnector::default());
        let service = service(connector.clone(), Some("abc123"));

        let details = service.meeting_details("abc123", "m1").await.unwrap();

        assert_eq!(details["id"], json!("m1"));
        assert_eq!(connector.queries(), vec!["info https://smba.example.com/ m1".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_reference_is_not_found() {
        let connector = Arc::new(RecordingConnector::default());
        let service = service(connector.clone(), Some("abc123"));

        let err = service.meeting_details("other", "m1").await.unwrap_err();
        assert!(matches!(err, DomainError::ConversationNotFound(id) if id == "other"));
        assert!(connector.queries().is_empty());

        assert!(matches!(
            service.send_in_meeting_dialog("other").await,
            Err(DomainError::ConversationNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_platform_failure_is_meeting_query_error() {
        let connector = Arc::new(RecordingConnector {
            fail_queries: true,
            ..Default::default()
        });
        let service = service(connector, Some("abc123"));
        let claims = IdentityClaims {
            oid: "oid-1".into(),
            tid: "tid-1".into(),
        };

        assert!(matches!(
            service.participant_info("abc123", "m1", &claims).await,
            Err(DomainError::MeetingQuery(_))
        ));
    }

    #[tokio::test]
    async fn test_participant_info_passes_claims() {
        let connector = Arc::new(RecordingConnector::default());
        let service = service(connector.clone(), Some("abc123"));
        let claims = IdentityClaims {
            oid: "oid-1".into(),
            tid: "tid-1".into(),
        };

        let participant = service.participant_info("abc123", "m1", &claims).await.unwrap();

        assert_eq!(participant["user"]["id"], json!("oid-1"));
        assert_eq!(
            connector.queries(),
            vec!["participant https://smba.example.com/ m1 oid-1 tid-1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_in_meeting_dialog_is_sent_in_background() {
        let connector = Arc::new(RecordingConnector::default());
        let service = service(connector.clone(), Some("abc123"));

        service
            .send_in_meeting_dialog("abc123")
            .await
            .unwrap()
            .await
            .unwrap();

        let sent = connector.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].conversation_id(), Some("abc123"));
        assert_eq!(
            sent[0].channel_data.as_ref().unwrap()["notification"]["alertInMeeting"],
            json!(true)
        );
    }
}
