//! Route table for the conversation API.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::ConversationService;

use super::handlers;

/// Builds the API router over the conversation service.
pub fn router(service: Arc<ConversationService>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/api/conversations", post(handlers::start_conversation))
        .route("/api/conversations/:id", get(handlers::get_conversation))
        .route(
            "/api/conversations/:id/messages",
            post(handlers::send_message),
        )
        .route("/api/conversations/:id/cancel", post(handlers::cancel_turn))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .with_state(service)
}
