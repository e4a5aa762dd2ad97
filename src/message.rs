// src/message.rs
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Inbound body of the chat endpoint, as the browser sends it.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub language: Option<String>,
    pub session_id: Option<String>,
}

/// A chat request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidChat {
    pub message: String,
    pub language: String,
    pub session_id: Option<String>,
}

impl ChatRequest {
    pub fn parse(raw: &[u8]) -> Result<ValidChat, AppError> {
        let req: ChatRequest = serde_json::from_slice(raw).map_err(|_| AppError::InvalidJson)?;
        req.validate()
    }

    pub fn validate(self) -> Result<ValidChat, AppError> {
        let message = self
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or(AppError::MissingMessage)?
            .to_string();

        let language = non_blank(self.language).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Ok(ValidChat {
            message,
            language,
            session_id: non_blank(self.session_id),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct NewMessage {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

/// Body posted to the upstream service.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UpstreamPayload {
    Agent {
        app_name: String,
        user_id: String,
        session_id: String,
        new_message: NewMessage,
    },
    Simple {
        message: String,
        language: String,
        session_id: String,
    },
}
