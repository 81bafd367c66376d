//! Voice bot dispatch - GET /botJoinMeeting

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JoinQuery {
    #[serde(rename = "joinURL")]
    pub join_url: String,
}

pub async fn bot_join_meeting(
    State(state): State<AppState>,
    Query(query): Query<JoinQuery>,
) -> Result<Json<Value>, ApiError> {
    let result = state.voice_bot_service.join_meeting(&query.join_url).await?;
    Ok(Json(result))
}
