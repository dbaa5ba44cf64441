use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::pipeline::AnswerPipeline;

pub mod handlers;
pub mod models;
pub mod session;

use session::SessionStore;

pub struct AppState {
    pub pipeline: AnswerPipeline,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(pipeline: AnswerPipeline) -> Self {
        Self::with_sessions(pipeline, SessionStore::new())
    }

    pub fn with_sessions(pipeline: AnswerPipeline, sessions: SessionStore) -> Self {
        Self { pipeline, sessions }
    }
}

pub fn create_router(state: Arc<AppState>, static_dir: &str) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API routes
        .route("/api/ask", post(handlers::ask_handler))
        .route(
            "/api/history/:session_id",
            get(handlers::history_handler).delete(handlers::clear_history_handler),
        )
        .with_state(state)
        // Static file serving for the UI
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
}
