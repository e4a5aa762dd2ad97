// Stand-in for the remote AI service, used by the integration tests.
#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, time::Duration};

use afiyapal_web::{
    config::{AppConfig, UpstreamConfig},
    routes::create_router_with,
    state::{AppState, SharedState},
};
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::Value;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::{Mutex, oneshot},
};

#[derive(Debug, Clone)]
pub struct Received {
    pub path: String,
    pub body: Value,
}

struct MockState {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
    received: Mutex<Vec<Received>>,
}

pub struct MockUpstream {
    pub url: String,
    state: Arc<MockState>,
    _shutdown: oneshot::Sender<()>,
}

impl MockUpstream {
    pub async fn start(status: StatusCode, body: &str) -> Self {
        Self::start_with_delay(status, body, None).await
    }

    pub async fn start_with_delay(status: StatusCode, body: &str, delay: Option<Duration>) -> Self {
        let state = Arc::new(MockState {
            status,
            body: body.to_string(),
            delay,
            received: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/apps/{app}/run", post(handle))
            .route("/chat", post(handle))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = server.await {
                eprintln!("mock upstream error: {}", e);
            }
        });

        Self {
            url,
            state,
            _shutdown: shutdown_tx,
        }
    }

    pub async fn received(&self) -> Vec<Received> {
        self.state.received.lock().await.clone()
    }
}

async fn handle(State(mock): State<Arc<MockState>>, uri: Uri, Json(body): Json<Value>) -> Response {
    mock.received.lock().await.push(Received {
        path: uri.path().to_string(),
        body,
    });
    if let Some(delay) = mock.delay {
        tokio::time::sleep(delay).await;
    }
    (
        mock.status,
        [(header::CONTENT_TYPE, "application/json")],
        mock.body.clone(),
    )
        .into_response()
}

/// An address nothing is listening on.
pub fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

pub fn public_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public")
}

pub fn config_for(upstream: UpstreamConfig) -> AppConfig {
    let mut config = AppConfig::with_upstream(upstream);
    config.public_dir = public_dir();
    config
}

pub fn app_from(config: AppConfig, extra: Router<SharedState>) -> Router {
    let state = Arc::new(AppState::new(config).unwrap());
    create_router_with(state, extra)
}

pub fn app_with(upstream: UpstreamConfig) -> Router {
    app_from(config_for(upstream), Router::new())
}

pub fn app_for(base_url: &str) -> Router {
    app_with(UpstreamConfig::new(base_url))
}

/// Upstream speaking raw HTTP/1.1: reads each request in full, writes `reply`
/// verbatim (nothing when `None`) and closes the socket.
pub async fn raw_upstream(reply: Option<&'static [u8]>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut socket).await;
                if let Some(reply) = reply {
                    let _ = socket.write_all(reply).await;
                }
                let _ = socket.shutdown().await;
            });
        }
    });
    url
}

async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                return;
            }
        }
    }
}
