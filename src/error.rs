// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Everything the chat endpoint can fail with. Each variant maps to exactly
/// one status code and an `{"error": ...}` body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request format")]
    InvalidJson,
    #[error("Message is required.")]
    MissingMessage,
    #[error("AI service timed out")]
    UpstreamTimeout,
    #[error("Could not connect to AI service")]
    UpstreamUnreachable,
    #[error("Error communicating with AI service: {0}")]
    UpstreamTransport(String),
    #[error("AI service error: {}", .0.as_u16())]
    UpstreamStatus(StatusCode),
    #[error("AI service returned an invalid response")]
    UpstreamMalformed,
    #[error("An unexpected error occurred")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidJson | Self::MissingMessage => StatusCode::BAD_REQUEST,
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::UpstreamUnreachable | Self::UpstreamTransport(_) | Self::UpstreamMalformed => {
                StatusCode::BAD_GATEWAY
            }
            Self::UpstreamStatus(code) => *code,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::UpstreamTimeout
        } else if err.is_connect() {
            Self::UpstreamUnreachable
        } else if err.is_builder() {
            Self::Internal(err.to_string())
        } else {
            Self::UpstreamTransport(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Internal details are logged by the caller, never echoed to the client.
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
