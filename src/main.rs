use std::sync::Arc;

use afiyapal_web::{config::AppConfig, routes, state::AppState};
use anyhow::Context;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("afiyapal_web=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let addr = config.bind_addr;
    info!(
        upstream = %config.upstream.endpoint(),
        format = ?config.upstream.format,
        timeout_secs = config.upstream.timeout.as_secs(),
        public_dir = %config.public_dir.display(),
        "configuration loaded"
    );

    let state = Arc::new(AppState::new(config).context("failed to build AI service client")?);

    let cors = CorsLayer::very_permissive();
    let app = routes::create_router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("afiyapal web running at http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
