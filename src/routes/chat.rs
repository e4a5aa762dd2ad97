use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::{
    error::AppError,
    message::ChatRequest,
    services::{session::{Identity, SessionContext}, upstream::preview},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    session: SessionContext,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let chat = match body
        .map_err(|e| {
            warn!(error = %e, "could not read chat request body");
            AppError::InvalidJson
        })
        .and_then(|raw| ChatRequest::parse(&raw))
    {
        Ok(chat) => chat,
        Err(err) => {
            warn!(status = err.status_code().as_u16(), error = %err, "rejected chat request");
            return err.into_response();
        }
    };

    let identity = Identity::resolve(&session, chat.session_id.as_deref());

    let mut response = match state.upstream.forward(&chat, &identity).await {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(err) => {
            if let AppError::Internal(detail) = &err {
                error!(
                    url = %state.upstream.config().endpoint(),
                    message = %preview(&chat.message),
                    %detail,
                    "unexpected error while proxying chat"
                );
            }
            err.into_response()
        }
    };

    if let Some(cookie) = identity.cookie() {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}
