//! Outbound HTTP adapters (reqwest)

pub mod identity_provider;
pub mod bot_connector;
pub mod voice_bot;

use std::time::Duration;

use reqwest::Client;

pub use bot_connector::HttpBotConnector;
pub use identity_provider::AadIdentityProvider;
pub use voice_bot::HttpVoiceBotClient;

/// Shared client for every outbound call. All requests get the same timeout.
pub fn build_http_client(timeout_seconds: u64) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("meeting-relay/", env!("CARGO_PKG_VERSION")))
        .build()
}
