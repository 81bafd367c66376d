//! Configuration management
//!
//! Every setting comes from the process environment (optionally seeded from a
//! dotenv file). Keys are the upper-case variable names, e.g. `BOT_ID` or
//! `VOICE_ECHO_BOT_URL`.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::constants::*;
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    /// Bot registration. Both may be empty when running against the emulator,
    /// which also disables inbound channel authentication.
    #[serde(default)]
    pub bot_id: String,
    #[serde(default)]
    pub bot_password: String,

    /// App registration used for the on-behalf-of exchange.
    pub m365_client_id: String,
    pub m365_client_secret: String,
    /// Delegated permission appended to the Graph resource, e.g. `User.Read`.
    pub graph_scopes: String,

    pub voice_echo_bot_url: String,
    pub teamsfx_endpoint: String,
    pub teams_app_id: String,

    pub login_authority: String,
    pub bot_openid_metadata_url: String,
    pub conversation_store_path: Option<String>,
    pub http_timeout_seconds: u64,

    pub dialog_width: u32,
    pub dialog_height: u32,
    pub dialog_title: String,
}

impl AppConfig {
    /// Load `.env` (or `.env.development.local` when `APP_ENV=development.local`)
    /// and then read the environment.
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_default();
        if env == "development.local" {
            dotenvy::from_filename(".env.development.local").ok();
        } else {
            dotenvy::dotenv().ok();
        }
        Self::from_environment(Environment::default())
    }

    /// Build from an explicit variable map instead of the process environment.
    pub fn from_vars(vars: config::Map<String, String>) -> Result<Self, AppError> {
        Self::from_environment(Environment::default().source(Some(vars)))
    }

    fn from_environment(source: Environment) -> Result<Self, AppError> {
        let config = Self::read(source)?;
        config.validate()?;
        Ok(config)
    }

    fn read(source: Environment) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", DEFAULT_PORT)?
            .set_default("login_authority", DEFAULT_LOGIN_AUTHORITY)?
            .set_default("bot_openid_metadata_url", DEFAULT_BOT_OPENID_METADATA_URL)?
            .set_default("http_timeout_seconds", DEFAULT_HTTP_TIMEOUT_SECONDS)?
            .set_default("dialog_width", DEFAULT_DIALOG_WIDTH)?
            .set_default("dialog_height", DEFAULT_DIALOG_HEIGHT)?
            .set_default("dialog_title", DEFAULT_DIALOG_TITLE)?
            .add_source(source)
            .build()?;
        config.try_deserialize()
    }

    fn validate(&self) -> Result<(), AppError> {
        for (key, value) in [
            ("M365_CLIENT_ID", &self.m365_client_id),
            ("M365_CLIENT_SECRET", &self.m365_client_secret),
            ("GRAPH_SCOPES", &self.graph_scopes),
            ("VOICE_ECHO_BOT_URL", &self.voice_echo_bot_url),
            ("TEAMSFX_ENDPOINT", &self.teamsfx_endpoint),
            ("TEAMS_APP_ID", &self.teams_app_id),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::InvalidConfig(format!("{key} must not be empty")));
            }
        }
        if self.http_timeout_seconds == 0 {
            return Err(AppError::InvalidConfig(
                "HTTP_TIMEOUT_SECONDS must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Full scope requested in the on-behalf-of exchange.
    pub fn graph_scope(&self) -> String {
        format!("{}{}", GRAPH_RESOURCE, self.graph_scopes)
    }

    /// Inbound channel authentication is skipped when no bot id is configured.
    pub fn channel_auth_enabled(&self) -> bool {
        !self.bot_id.trim().is_empty()
    }
}
