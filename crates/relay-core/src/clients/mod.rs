//! Outbound client traits (ports) for the external collaborators.

pub mod bot_connector;
pub mod identity_provider;
pub mod voice_bot;

pub use bot_connector::BotConnector;
pub use identity_provider::IdentityProvider;
pub use voice_bot::VoiceBotClient;

#[cfg(test)]
pub use bot_connector::MockBotConnector;
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
#[cfg(test)]
pub use voice_bot::MockVoiceBotClient;
