// src/config.rs
use std::{net::SocketAddr, path::PathBuf, time::Duration};

use axum::http::HeaderName;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:8080";
pub const DEFAULT_APP_NAME: &str = "afiyapal_multi_tool_agent";
pub const DEFAULT_AUTH_USER_HEADER: &str = "x-authenticated-user";

pub const MIN_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BIND_ADDR `{0}` is not a socket address")]
    InvalidBindAddr(String),
    #[error("UPSTREAM_TIMEOUT_SECS `{0}` is not a whole number of seconds")]
    InvalidTimeout(String),
    #[error("UPSTREAM_FORMAT `{0}` is not one of `agent`, `simple`")]
    InvalidFormat(String),
    #[error("AUTH_USER_HEADER `{0}` is not a valid header name")]
    InvalidHeader(String),
    #[error("CLOUD_RUN_URL must not be empty")]
    EmptyUpstreamUrl,
}

/// Which payload shape the upstream service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamFormat {
    /// Agent runtime: `/apps/{app}/run` with `new_message.parts`.
    Agent,
    /// Flat `{message, language, session_id}` posted to `/chat`.
    Simple,
}

impl std::str::FromStr for UpstreamFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "agent" => Ok(Self::Agent),
            "simple" => Ok(Self::Simple),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub app_name: String,
    pub format: UpstreamFormat,
    pub timeout: Duration,
}

impl UpstreamConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            format: UpstreamFormat::Agent,
            timeout: MAX_UPSTREAM_TIMEOUT,
        }
    }

    /// Full URL of the endpoint the proxy posts to.
    pub fn endpoint(&self) -> String {
        match self.format {
            UpstreamFormat::Agent => format!("{}/apps/{}/run", self.base_url, self.app_name),
            UpstreamFormat::Simple => format!("{}/chat", self.base_url),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub public_dir: PathBuf,
    pub auth_user_header: HeaderName,
    pub upstream: UpstreamConfig,
}

impl AppConfig {
    /// Configuration pointing at `upstream`, with every other value defaulted.
    pub fn with_upstream(upstream: UpstreamConfig) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            auth_user_header: HeaderName::from_static(DEFAULT_AUTH_USER_HEADER),
            upstream,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind_raw = get("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_raw.clone()))?;

        let base_url = get("CLOUD_RUN_URL", DEFAULT_UPSTREAM_URL);
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ConfigError::EmptyUpstreamUrl);
        }

        let timeout_raw = get("UPSTREAM_TIMEOUT_SECS", "60");
        let timeout = timeout_raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidTimeout(timeout_raw.clone()))?
            .clamp(MIN_UPSTREAM_TIMEOUT, MAX_UPSTREAM_TIMEOUT);

        let header_raw = get("AUTH_USER_HEADER", DEFAULT_AUTH_USER_HEADER);
        let auth_user_header = HeaderName::try_from(header_raw.to_ascii_lowercase())
            .map_err(|_| ConfigError::InvalidHeader(header_raw.clone()))?;

        Ok(Self {
            bind_addr,
            public_dir: PathBuf::from(get("PUBLIC_DIR", DEFAULT_PUBLIC_DIR)),
            auth_user_header,
            upstream: UpstreamConfig {
                base_url: base_url.to_string(),
                app_name: get("AGENT_APP_NAME", DEFAULT_APP_NAME),
                format: get("UPSTREAM_FORMAT", "agent").parse()?,
                timeout,
            },
        })
    }
}
