//! # Relay Core - Domain Module

pub mod activity;
pub mod conversation;
pub mod token;

pub use activity::{activity_types, Activity};
pub use conversation::{ChannelAccount, ConversationAccount, ConversationReference};
pub use relay_security::IdentityClaims;
pub use token::{AccessTokenResult, ProviderTokenResponse};
