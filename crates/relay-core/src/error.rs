//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("No conversation reference stored for {0}")]
    ConversationNotFound(String),

    #[error("Invalid identity token: {0}")]
    InvalidIdentityToken(String),

    #[error("User consent or MFA required")]
    ConsentRequired,

    #[error("Access token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Meeting query failed: {0}")]
    MeetingQuery(String),

    #[error("Voice bot dispatch failed: {0}")]
    VoiceBotDispatch(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid activity: {0}")]
    InvalidActivity(String),

    #[error("Connector error: {0}")]
    Connector(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Turn failed: {0}")]
    Turn(String),
}

impl From<relay_security::SsoTokenError> for DomainError {
    fn from(err: relay_security::SsoTokenError) -> Self {
        DomainError::InvalidIdentityToken(err.to_string())
    }
}

impl From<relay_security::ChannelAuthError> for DomainError {
    fn from(err: relay_security::ChannelAuthError) -> Self {
        DomainError::Unauthorized(err.to_string())
    }
}
