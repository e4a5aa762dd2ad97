// src/routes/mod.rs
pub mod chat;
pub mod pages;

use std::any::Any;

use crate::{error::AppError, state::SharedState};
use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chat::chat_handler;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;

pub fn create_router(state: SharedState) -> Router {
    create_router_with(state, Router::new())
}

/// Like `create_router`, with `extra` mounted behind the same panic and trace layers.
pub fn create_router_with(state: SharedState, extra: Router<SharedState>) -> Router {
    let static_dir = state.config.public_dir.join("static");

    Router::new()
        .merge(extra)
        .route("/", get(pages::home))
        .route("/chatbot/", get(pages::chatbot))
        .route("/chatbot-api/", post(chat_handler))
        .route("/chat-api", post(chat_handler))
        .route("/health", get(|| async { "OK" }))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(%detail, "handler panicked");
    AppError::Internal(detail).into_response()
}
