// ============================================================================
// Relay API - Error responses
// File: crates/relay-api/src/error.rs
// ============================================================================

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use relay_core::error::DomainError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid SSO token: {0}")]
    InvalidSsoToken(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Consent required")]
    ConsentRequired,

    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Voice bot error: {0}")]
    VoiceBot(String),

    #[error("Meeting query failed: {0}")]
    MeetingQuery(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ConversationNotFound(id) => ApiError::ConversationNotFound(id),
            DomainError::InvalidIdentityToken(msg) => ApiError::InvalidSsoToken(msg),
            DomainError::ConsentRequired => ApiError::ConsentRequired,
            DomainError::TokenExchangeFailed(msg) => ApiError::TokenExchange(msg),
            DomainError::MeetingQuery(msg) => ApiError::MeetingQuery(msg),
            DomainError::VoiceBotDispatch(msg) => ApiError::VoiceBot(msg),
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            DomainError::InvalidActivity(msg) => ApiError::BadRequest(msg),
            other @ (DomainError::Connector(_) | DomainError::Store(_) | DomainError::Turn(_)) => {
                ApiError::InternalError(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "bad_request")
            }
            ApiError::InvalidSsoToken(msg) => {
                tracing::warn!("Invalid SSO token: {}", msg);
                (StatusCode::BAD_REQUEST, "invalid_sso_token")
            }
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, "unauthorized")
            }
            ApiError::ConsentRequired => {
                tracing::warn!("User consent required");
                (StatusCode::FORBIDDEN, "consent_required")
            }
            ApiError::ConversationNotFound(id) => {
                tracing::warn!("Conversation not found: {}", id);
                (StatusCode::NOT_FOUND, "conversation_not_found")
            }
            ApiError::TokenExchange(msg) => {
                tracing::error!("Token exchange failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Could not exchange access token")
            }
            ApiError::VoiceBot(msg) => {
                tracing::error!("Voice bot error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error to join Voice Echo Bot")
            }
            ApiError::MeetingQuery(msg) => {
                tracing::error!("Meeting query failed: {}", msg);
                (StatusCode::BAD_GATEWAY, "meeting_query_failed")
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
