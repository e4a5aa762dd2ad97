use axum::{extract::State, response::Html};
use tracing::error;

use crate::{error::AppError, state::SharedState};

pub async fn home(State(state): State<SharedState>) -> Result<Html<String>, AppError> {
    render(&state, "index.html").await
}

pub async fn chatbot(State(state): State<SharedState>) -> Result<Html<String>, AppError> {
    render(&state, "chatbot.html").await
}

async fn render(state: &SharedState, page: &str) -> Result<Html<String>, AppError> {
    let path = state.config.public_dir.join(page);
    tokio::fs::read_to_string(&path).await.map(Html).map_err(|e| {
        error!(path = %path.display(), error = %e, "page could not be read");
        AppError::Internal(e.to_string())
    })
}
