//! SSO identity token claims
//!
//! The Teams client hands the relay an SSO token for the signed-in user. The
//! relay reads `oid` and `tid` out of it WITHOUT checking the signature: the
//! claims are only used to address the tenant's token endpoint, to look up a
//! meeting participant, and for logging. The identity provider validates the
//! token itself when it is presented as the on-behalf-of assertion, so that
//! exchange is the real verification step. Never use [`IdentityClaims`] for an
//! authorization decision on its own.

use jsonwebtoken::dangerous::insecure_decode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SsoTokenError {
    #[error("SSO token is empty")]
    Empty,
    #[error("SSO token could not be decoded: {0}")]
    Malformed(String),
}

/// Unauthenticated claims read from a caller-supplied SSO token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Participant (AAD object) id.
    pub oid: String,
    /// Tenant id.
    pub tid: String,
}

/// Read `oid`/`tid` from an SSO token. No signature, expiry or audience check is made.
pub fn decode_unverified(token: &str) -> Result<IdentityClaims, SsoTokenError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(SsoTokenError::Empty);
    }

    insecure_decode::<IdentityClaims>(token)
        .map(|data| data.claims)
        .map_err(|e| SsoTokenError::Malformed(e.to_string()))
}
