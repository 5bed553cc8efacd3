//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let pomodoro = Router::new()
        .route("/create", post(create_handler))
        .route("/health", get(health_handler))
        .route("/:session_id", delete(delete_handler))
        .route("/:session_id/start", post(start_handler))
        .route("/:session_id/pause", post(pause_handler))
        .route("/:session_id/reset", post(reset_handler))
        .route("/:session_id/info", get(info_handler))
        .route("/:session_id/status", get(status_handler));

    Router::new()
        .nest("/api/pomodoro", pomodoro)
        // The browser client is served from a different origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
