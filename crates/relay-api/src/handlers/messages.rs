//! Inbound Bot Framework activities - POST /api/messages

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};

use relay_core::domain::Activity;

use crate::error::ApiError;
use crate::state::AppState;

/// Every body rejection (bad syntax, missing `type`, wrong content type) is a 400.
pub async fn messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Activity>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(activity) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

    state.adapter.process_activity(authorization, activity).await?;
    Ok(StatusCode::OK)
}
