//! Test doubles shared by the service tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::clients::BotConnector;
use crate::domain::{Activity, ChannelAccount, ConversationAccount};
use crate::error::DomainError;

pub fn inbound_activity(channel_id: &str, conversation_id: &str) -> Activity {
    Activity {
        activity_type: "message".into(),
        id: Some("act-1".into()),
        service_url: Some("https://smba.example.com/".into()),
        channel_id: Some(channel_id.into()),
        from: Some(ChannelAccount { id: "29:user".into(), ..Default::default() }),
        recipient: Some(ChannelAccount { id: "28:bot".into(), ..Default::default() }),
        conversation: Some(ConversationAccount { id: conversation_id.into(), ..Default::default() }),
        text: Some("hi".into()),
        ..Default::default()
    }
}

/// Records everything sent through it. Meeting queries answer with a canned
/// payload unless `fail_queries` is set.
#[derive(Default)]
pub struct RecordingConnector {
    pub(crate) sent: Mutex<Vec<Activity>>,
    pub(crate) queries: Mutex<Vec<String>>,
    pub fail_sends: bool,
    pub fail_queries: bool,
}

impl RecordingConnector {
    pub fn sent(&self) -> Vec<Activity> {
        self.sent.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl BotConnector for RecordingConnector {
    async fn send_activity(&self, activity: &Activity) -> Result<Option<String>, DomainError> {
        if self.fail_sends {
            return Err(DomainError::Connector("send refused".into()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(activity.clone());
        Ok(Some(format!("sent-{}", sent.len())))
    }

    async fn get_meeting_info(&self, service_url: &str, meeting_id: &str) -> Result<Value, DomainError> {
        self.queries
            .lock()
            .unwrap()
            .push(format!("info {service_url} {meeting_id}"));
        if self.fail_queries {
            return Err(DomainError::Connector("404 Not Found".into()));
        }
        Ok(json!({
            "details": { "id": meeting_id, "joinUrl": "https://teams.example.com/join" },
            "organizer": { "id": "29:organizer" }
        }))
    }

    async fn get_meeting_participant(
        &self,
        service_url: &str,
        meeting_id: &str,
        participant_id: &str,
        tenant_id: &str,
    ) -> Result<Value, DomainError> {
        self.queries.lock().unwrap().push(format!(
            "participant {service_url} {meeting_id} {participant_id} {tenant_id}"
        ));
        if self.fail_queries {
            return Err(DomainError::Connector("403 Forbidden".into()));
        }
        Ok(json!({
            "user": { "id": participant_id },
            "meeting": { "role": "Organizer", "inMeeting": true }
        }))
    }
}
