// ============================================================================
// Relay Security - Bot Framework channel authentication
// File: crates/relay-security/src/channel_auth.rs
// ============================================================================
//! Validates the bearer token the Bot Framework channel attaches to every
//! activity POSTed to `/api/messages`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use relay_shared::constants::BOT_FRAMEWORK_TOKEN_ISSUER;

const KEY_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
/// An unknown `kid` only triggers a refetch once the keys are at least this old.
const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(5 * 60);
const CLOCK_SKEW_SECONDS: u64 = 300;

#[derive(Error, Debug)]
pub enum ChannelAuthError {
    #[error("Missing or malformed Authorization header")]
    MissingToken,
    #[error("Token validation failed: {0}")]
    InvalidToken(String),
    #[error("Signing key {0} not found")]
    UnknownSigningKey(String),
    #[error("Token serviceUrl {token} does not match activity serviceUrl {activity}")]
    ServiceUrlMismatch { token: String, activity: String },
    #[error("Signing keys unavailable: {0}")]
    KeysUnavailable(String),
}

/// Caller identity established for an inbound activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelIdentity {
    pub audience: Option<String>,
    pub service_url: Option<String>,
}

#[async_trait]
pub trait ChannelAuthenticator: Send + Sync {
    /// Authenticate an inbound request given its raw `Authorization` header
    /// and the `serviceUrl` carried by the activity body.
    async fn authenticate(
        &self,
        authorization: Option<&str>,
        activity_service_url: Option<&str>,
    ) -> Result<ChannelIdentity, ChannelAuthError>;
}

/// Accepts every request. Used when no bot id is configured (emulator / local runs).
#[derive(Debug, Default, Clone)]
pub struct AnonymousChannelAuthenticator;

#[async_trait]
impl ChannelAuthenticator for AnonymousChannelAuthenticator {
    async fn authenticate(
        &self,
        _authorization: Option<&str>,
        activity_service_url: Option<&str>,
    ) -> Result<ChannelIdentity, ChannelAuthError> {
        Ok(ChannelIdentity {
            audience: None,
            service_url: activity_service_url.map(str::to_string),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OpenIdMetadata {
    jwks_uri: String,
}

#[derive(Debug, Deserialize)]
struct ChannelClaims {
    aud: String,
    #[serde(default, rename = "serviceurl")]
    service_url: Option<String>,
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// Validates RS256 channel tokens against the Bot Framework OpenID signing keys.
pub struct JwksChannelAuthenticator {
    http: Client,
    metadata_url: String,
    app_id: String,
    issuer: String,
    keys: RwLock<Option<CachedKeys>>,
}

impl JwksChannelAuthenticator {
    pub fn new(http: Client, metadata_url: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            http,
            metadata_url: metadata_url.into(),
            app_id: app_id.into(),
            issuer: BOT_FRAMEWORK_TOKEN_ISSUER.to_string(),
            keys: RwLock::new(None),
        }
    }

    /// Override the expected `iss` claim.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    async fn signing_key(&self, kid: &str) -> Result<DecodingKey, ChannelAuthError> {
        {
            let cached = self.keys.read().await;
            if let Some(cached) = cached.as_ref() {
                let age = cached.fetched_at.elapsed();
                if age < KEY_REFRESH_INTERVAL {
                    if let Some(jwk) = cached.keys.find(kid) {
                        return DecodingKey::from_jwk(jwk)
                            .map_err(|e| ChannelAuthError::InvalidToken(e.to_string()));
                    }
                    if age < MIN_REFETCH_INTERVAL {
                        debug!("Signing key {} unknown, keys refreshed {:?} ago", kid, age);
                        return Err(ChannelAuthError::UnknownSigningKey(kid.to_string()));
                    }
                }
            }
        }

        // Stale cache or a rotated key. The write lock is held across the
        // fetch so concurrent misses share one refresh.
        let mut slot = self.keys.write().await;
        if let Some(cached) = slot.as_ref() {
            if cached.fetched_at.elapsed() < MIN_REFETCH_INTERVAL {
                return cached
                    .keys
                    .find(kid)
                    .map(DecodingKey::from_jwk)
                    .transpose()
                    .map_err(|e| ChannelAuthError::InvalidToken(e.to_string()))?
                    .ok_or_else(|| ChannelAuthError::UnknownSigningKey(kid.to_string()));
            }
        }

        let keys = self.fetch_keys().await?;
        let key = keys
            .find(kid)
            .map(DecodingKey::from_jwk)
            .transpose()
            .map_err(|e| ChannelAuthError::InvalidToken(e.to_string()))?;

        *slot = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });

        key.ok_or_else(|| ChannelAuthError::UnknownSigningKey(kid.to_string()))
    }

    async fn fetch_keys(&self) -> Result<JwkSet, ChannelAuthError> {
        debug!("Fetching OpenID metadata from {}", self.metadata_url);
        let metadata: OpenIdMetadata = self
            .http
            .get(&self.metadata_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ChannelAuthError::KeysUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| ChannelAuthError::KeysUnavailable(e.to_string()))?;

        let keys: JwkSet = self
            .http
            .get(&metadata.jwks_uri)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ChannelAuthError::KeysUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| ChannelAuthError::KeysUnavailable(e.to_string()))?;

        info!("Loaded {} channel signing keys", keys.keys.len());
        Ok(keys)
    }
}

#[async_trait]
impl ChannelAuthenticator for JwksChannelAuthenticator {
    async fn authenticate(
        &self,
        authorization: Option<&str>,
        activity_service_url: Option<&str>,
    ) -> Result<ChannelIdentity, ChannelAuthError> {
        let token = authorization
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ChannelAuthError::MissingToken)?;

        let header =
            decode_header(token).map_err(|e| ChannelAuthError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| ChannelAuthError::InvalidToken("token has no kid".to_string()))?;
        let key = self.signing_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.app_id]);
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = CLOCK_SKEW_SECONDS;

        let claims = decode::<ChannelClaims>(token, &key, &validation)
            .map_err(|e| ChannelAuthError::InvalidToken(e.to_string()))?
            .claims;

        if let (Some(token_url), Some(activity_url)) =
            (claims.service_url.as_deref(), activity_service_url)
        {
            if token_url != activity_url {
                warn!("Channel token serviceUrl mismatch: {} vs {}", token_url, activity_url);
                return Err(ChannelAuthError::ServiceUrlMismatch {
                    token: token_url.to_string(),
                    activity: activity_url.to_string(),
                });
            }
        }

        Ok(ChannelIdentity {
            audience: Some(claims.aud),
            service_url: claims.service_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_anonymous_accepts_missing_header() {
        let identity = AnonymousChannelAuthenticator
            .authenticate(None, Some("https://smba.example.com/"))
            .await
            .unwrap();
        assert_eq!(identity.service_url.as_deref(), Some("https://smba.example.com/"));
        assert!(identity.audience.is_none());
    }

    #[tokio::test]
    async fn test_rejects_non_bearer_header_without_network() {
        let auth = JwksChannelAuthenticator::new(
            Client::new(),
            "http://127.0.0.1:9/unreachable",
            "bot-app-id",
        );
        let err = auth.authenticate(Some("Basic abc"), None).await.unwrap_err();
        assert!(matches!(err, ChannelAuthError::MissingToken));

        let err = auth.authenticate(None, None).await.unwrap_err();
        assert!(matches!(err, ChannelAuthError::MissingToken));
    }
}
