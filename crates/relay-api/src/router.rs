//! Route table

use axum::{
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers::{dialog, fallback, health, meeting, messages, token, voice_bot};
use crate::state::AppState;

/// Wrong-method requests on a known path get the same answer as unknown paths.
fn or_not_defined(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.fallback(fallback::path_not_defined)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", or_not_defined(get(health::health_check)))
        .route(
            "/getGraphAccessToken",
            or_not_defined(get(token::get_graph_access_token)),
        )
        .route(
            "/getMeetingJoinURL",
            or_not_defined(get(meeting::get_meeting_join_url)),
        )
        .route(
            "/getParticipantInfo",
            or_not_defined(get(meeting::get_participant_info)),
        )
        .route("/inMeetingDialog", or_not_defined(get(dialog::in_meeting_dialog)))
        .route("/botJoinMeeting", or_not_defined(get(voice_bot::bot_join_meeting)))
        .route("/api/messages", or_not_defined(post(messages::messages)))
        .fallback(fallback::path_not_defined)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
}
