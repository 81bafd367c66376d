//! SSO to Graph token exchange - GET /getGraphAccessToken

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenQuery {
    pub sso_token: String,
}

pub async fn get_graph_access_token(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<Value>, ApiError> {
    let token = state.token_service.exchange(&query.sso_token).await?;
    Ok(Json(token))
}
