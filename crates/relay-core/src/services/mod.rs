//! Domain services (business logic)

pub mod token_service;
pub mod turn_context;
pub mod activity_handler;
pub mod bot_adapter;
pub mod meeting_service;
pub mod voice_bot_service;

pub use token_service::TokenExchangeService;
pub use turn_context::TurnContext;
pub use activity_handler::{ActivityHandler, ConversationCaptureHandler};
pub use bot_adapter::BotAdapter;
pub use meeting_service::{InMeetingDialog, MeetingService};
pub use voice_bot_service::VoiceBotService;

#[cfg(test)]
pub(crate) mod testing;
