// src/services/upstream.rs
use axum::body::Bytes;
use serde::de::IgnoredAny;
use tracing::{debug, info, warn};

use crate::{
    config::{UpstreamConfig, UpstreamFormat},
    error::AppError,
    message::{NewMessage, Part, UpstreamPayload, ValidChat},
    services::session::Identity,
};

const PREVIEW_CHARS: usize = 50;

/// Shortened copy of a user message, safe for log lines.
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let mut out: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        out.push_str("...");
    }
    out
}

pub fn build_payload(config: &UpstreamConfig, chat: &ValidChat, identity: &Identity) -> UpstreamPayload {
    match config.format {
        UpstreamFormat::Agent => UpstreamPayload::Agent {
            app_name: config.app_name.clone(),
            user_id: identity.user_id.clone(),
            session_id: identity.session_id.clone(),
            new_message: NewMessage {
                role: "user",
                parts: vec![Part {
                    text: chat.message.clone(),
                }],
            },
        },
        UpstreamFormat::Simple => UpstreamPayload::Simple {
            message: chat.message.clone(),
            language: chat.language.clone(),
            session_id: identity.session_id.clone(),
        },
    }
}

/// Thin client for the remote AI service. Cheap to clone.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Sends one chat turn and returns the upstream body untouched.
    pub async fn forward(&self, chat: &ValidChat, identity: &Identity) -> Result<Bytes, AppError> {
        let url = self.config.endpoint();
        let payload = build_payload(&self.config, chat, identity);

        debug!(
            %url,
            session_id = %identity.session_id,
            user_id = %identity.user_id,
            language = %chat.language,
            "forwarding chat message"
        );

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .inspect_err(|e| {
                warn!(%url, message = %preview(&chat.message), error = %e, "AI service request failed")
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                %url,
                status = status.as_u16(),
                message = %preview(&chat.message),
                body = %preview(&body),
                "AI service returned an error status"
            );
            // Only 4xx/5xx are passed through; a 3xx or 1xx carries no JSON body.
            if status.is_client_error() || status.is_server_error() {
                return Err(AppError::UpstreamStatus(status));
            }
            return Err(AppError::UpstreamMalformed);
        }

        let body = response.bytes().await.inspect_err(|e| {
            warn!(%url, message = %preview(&chat.message), error = %e, "failed reading AI service response")
        })?;

        if serde_json::from_slice::<IgnoredAny>(&body).is_err() {
            warn!(%url, body = %preview(&String::from_utf8_lossy(&body)), "AI service response is not JSON");
            return Err(AppError::UpstreamMalformed);
        }

        info!(%url, session_id = %identity.session_id, bytes = body.len(), "AI service replied");
        Ok(body)
    }
}
