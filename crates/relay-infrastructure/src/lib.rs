//! # Relay Infrastructure
//!
//! Conversation store and HTTP client implementations (adapters).

pub mod store;
pub mod http;

pub use store::{FileConversationStore, MemoryConversationStore};
pub use http::{build_http_client, AadIdentityProvider, HttpBotConnector, HttpVoiceBotClient};
