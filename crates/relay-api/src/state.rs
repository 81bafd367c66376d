use std::sync::Arc;

use relay_core::services::{BotAdapter, MeetingService, TokenExchangeService, VoiceBotService};

#[derive(Clone)]
pub struct AppState {
    pub token_service: Arc<TokenExchangeService>,
    pub meeting_service: Arc<MeetingService>,
    pub voice_bot_service: Arc<VoiceBotService>,
    pub adapter: Arc<BotAdapter>,
}
