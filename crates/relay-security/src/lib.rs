//! # Relay Security
//!
//! Token handling at the relay's trust boundaries: unverified SSO claim
//! extraction and Bot Framework channel token validation.

pub mod sso_token;
pub mod channel_auth;

pub use sso_token::{decode_unverified, IdentityClaims, SsoTokenError};
pub use channel_auth::{
    AnonymousChannelAuthenticator, ChannelAuthError, ChannelAuthenticator, ChannelIdentity,
    JwksChannelAuthenticator,
};
