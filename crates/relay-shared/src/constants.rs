//! Application-wide constants

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

pub const DEFAULT_LOGIN_AUTHORITY: &str = "https://login.microsoftonline.com";
pub const DEFAULT_BOT_OPENID_METADATA_URL: &str =
    "https://login.botframework.com/v1/.well-known/openidconfiguration";
pub const BOT_FRAMEWORK_TOKEN_ISSUER: &str = "https://api.botframework.com";
pub const BOT_FRAMEWORK_TENANT: &str = "botframework.com";
pub const BOT_FRAMEWORK_SCOPE: &str = "https://api.botframework.com/.default";
pub const GRAPH_RESOURCE: &str = "https://graph.microsoft.com/";

pub const TEAMS_BUBBLE_BASE: &str = "https://teams.microsoft.com/l/bubble/";
pub const DEFAULT_DIALOG_WIDTH: u32 = 280;
pub const DEFAULT_DIALOG_HEIGHT: u32 = 180;
pub const DEFAULT_DIALOG_TITLE: &str = "Test in-meeting dialog";

pub const EMULATOR_CHANNEL_ID: &str = "emulator";
