// ============================================================================
// Relay API - Meeting Handlers
// File: crates/relay-api/src/handlers/meeting.rs
// ============================================================================
//! Meeting queries against conversations the bot has already seen.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use relay_core::error::DomainError;
use relay_security::decode_unverified;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingQuery {
    pub conversation_id: String,
    pub meeting_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantQuery {
    pub sso_token: String,
    pub meeting_id: String,
    pub conversation_id: String,
}

/// GET /getMeetingJoinURL - returns the meeting `details` (which carry the join URL).
pub async fn get_meeting_join_url(
    State(state): State<AppState>,
    Query(query): Query<MeetingQuery>,
) -> Result<Json<Value>, ApiError> {
    info!("Meeting details requested for {}", query.meeting_id);
    let details = state
        .meeting_service
        .meeting_details(&query.conversation_id, &query.meeting_id)
        .await?;
    Ok(Json(details))
}

/// GET /getParticipantInfo - the caller's own participant record.
///
/// The SSO token is only decoded to pick the participant and tenant ids.
pub async fn get_participant_info(
    State(state): State<AppState>,
    Query(query): Query<ParticipantQuery>,
) -> Result<Json<Value>, ApiError> {
    let claims = decode_unverified(&query.sso_token).map_err(DomainError::from)?;
    info!(
        "Participant info requested for {} in meeting {}",
        claims.oid, query.meeting_id
    );

    let participant = state
        .meeting_service
        .participant_info(&query.conversation_id, &query.meeting_id, &claims)
        .await?;
    Ok(Json(participant))
}
