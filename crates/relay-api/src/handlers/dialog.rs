//! In-meeting dialog notification - GET /inMeetingDialog

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogQuery {
    pub conversation_id: String,
}

/// Responds as soon as the conversation is known; delivery happens in the background.
pub async fn in_meeting_dialog(
    State(state): State<AppState>,
    Query(query): Query<DialogQuery>,
) -> Result<Json<Value>, ApiError> {
    state
        .meeting_service
        .send_in_meeting_dialog(&query.conversation_id)
        .await?;
    Ok(Json(json!({})))
}
