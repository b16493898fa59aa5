//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/health", get(handlers::health::health_check))
        .route("/healthcheck", get(handlers::health::health_check))
        // Raw platform events
        .route("/invoke", post(handlers::invoke::invoke))
        // WhatsApp webhook
        .route(
            "/webhook/whatsapp",
            get(handlers::whatsapp::verify_webhook).post(handlers::whatsapp::handle_webhook),
        )
        .with_state(state)
}
