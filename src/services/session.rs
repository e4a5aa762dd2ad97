// src/services/session.rs
use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, header, request::Parts},
};
use uuid::Uuid;

use crate::state::SharedState;

pub const SESSION_COOKIE: &str = "sessionid";
pub const ANONYMOUS_USER: &str = "anonymous_user";

/// What the request already tells us about who is calling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// Principal name set by the authenticating proxy in front of us.
    pub principal: Option<String>,
    /// Value of the `sessionid` cookie.
    pub session_cookie: Option<String>,
}

impl SessionContext {
    pub fn from_headers(headers: &HeaderMap, principal_header: &header::HeaderName) -> Self {
        let principal = headers
            .get(principal_header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let session_cookie = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, value)| value.trim().to_string())
            .filter(|v| !v.is_empty());

        Self {
            principal,
            session_cookie,
        }
    }
}

impl FromRequestParts<SharedState> for SessionContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers, &state.config.auth_user_header))
    }
}

/// Resolved identities for one chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub session_id: String,
    /// True when no session existed and `session_id` was minted here.
    pub created: bool,
}

impl Identity {
    /// Client-supplied id wins, then the cookie, then a fresh one.
    pub fn resolve(ctx: &SessionContext, requested: Option<&str>) -> Self {
        let user_id = ctx
            .principal
            .clone()
            .unwrap_or_else(|| ANONYMOUS_USER.to_string());

        match requested.or(ctx.session_cookie.as_deref()) {
            Some(existing) => Self {
                user_id,
                session_id: existing.to_string(),
                created: false,
            },
            None => Self {
                user_id,
                session_id: Uuid::new_v4().simple().to_string(),
                created: true,
            },
        }
    }

    /// `Set-Cookie` value for a freshly created session.
    pub fn cookie(&self) -> Option<HeaderValue> {
        if !self.created {
            return None;
        }
        HeaderValue::from_str(&format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
            self.session_id
        ))
        .ok()
    }
}
