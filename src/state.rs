// src/state.rs
use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::upstream::UpstreamClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: AppConfig,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let upstream = UpstreamClient::new(config.upstream.clone())?;
        Ok(Self { config, upstream })
    }
}
