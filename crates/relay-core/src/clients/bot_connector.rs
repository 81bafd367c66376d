//! Bot Connector REST surface used by the relay.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::Activity;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BotConnector: Send + Sync {
    /// Post an already-addressed activity to its conversation. Returns the
    /// id assigned by the channel, if any.
    async fn send_activity(&self, activity: &Activity) -> Result<Option<String>, DomainError>;

    /// `GET {serviceUrl}/v1/meetings/{meetingId}`
    async fn get_meeting_info(&self, service_url: &str, meeting_id: &str)
        -> Result<Value, DomainError>;

    /// `GET {serviceUrl}/v1/meetings/{meetingId}/participants/{participantId}?tenantId=`
    async fn get_meeting_participant(
        &self,
        service_url: &str,
        meeting_id: &str,
        participant_id: &str,
        tenant_id: &str,
    ) -> Result<Value, DomainError>;
}
