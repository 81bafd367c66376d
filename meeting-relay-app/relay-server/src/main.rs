use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use relay_api::{build_router, AppState};
use relay_core::repositories::ConversationStore;
use relay_core::services::{
    BotAdapter, ConversationCaptureHandler, InMeetingDialog, MeetingService, TokenExchangeService,
    VoiceBotService,
};
use relay_infrastructure::{
    build_http_client, AadIdentityProvider, FileConversationStore, HttpBotConnector,
    HttpVoiceBotClient, MemoryConversationStore,
};
use relay_security::{AnonymousChannelAuthenticator, ChannelAuthenticator, JwksChannelAuthenticator};
use relay_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (reads the dotenv file first)
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize telemetry
    relay_shared::telemetry::init_telemetry();

    info!("Meeting relay starting...");

    let http = build_http_client(config.http_timeout_seconds).context("Failed to build HTTP client")?;

    // Conversation store
    let store: Arc<dyn ConversationStore> = match &config.conversation_store_path {
        Some(path) => {
            info!("Using file conversation store at {}", path);
            Arc::new(FileConversationStore::open(path).await?)
        }
        None => {
            info!("Using in-memory conversation store");
            Arc::new(MemoryConversationStore::new())
        }
    };

    // Inbound channel authentication
    let authenticator: Arc<dyn ChannelAuthenticator> = if config.channel_auth_enabled() {
        Arc::new(JwksChannelAuthenticator::new(
            http.clone(),
            config.bot_openid_metadata_url.clone(),
            config.bot_id.clone(),
        ))
    } else {
        warn!("BOT_ID is empty: inbound activities are not authenticated");
        Arc::new(AnonymousChannelAuthenticator)
    };

    let connector = Arc::new(HttpBotConnector::from_config(http.clone(), &config));
    let adapter = Arc::new(BotAdapter::new(
        connector,
        authenticator,
        Arc::new(ConversationCaptureHandler::new(store.clone())),
    ));

    let dialog = InMeetingDialog::from_config(&config);
    info!("In-meeting dialog URL: {}", dialog.external_resource_url());

    let state = AppState {
        token_service: Arc::new(TokenExchangeService::new(Arc::new(
            AadIdentityProvider::from_config(http.clone(), &config),
        ))),
        meeting_service: Arc::new(MeetingService::new(store, adapter.clone(), dialog)),
        voice_bot_service: Arc::new(VoiceBotService::new(Arc::new(HttpVoiceBotClient::new(
            http,
            config.voice_echo_bot_url.clone(),
        )))),
        adapter,
    };

    let app = build_router(state);

    // Bind address
    let host: std::net::IpAddr = config.host.parse().context("Invalid HOST")?;
    let addr = SocketAddr::from((host, config.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
