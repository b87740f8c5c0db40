// File: services/slotwise_backend/src/main.rs
use slotwise_common::{logging, Context, SlotwiseError};
use slotwise_config::load_config;
use tokio::net::TcpListener;
use tracing::{info, warn};

mod app;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), SlotwiseError> {
    logging::init();

    let config = load_config()?;
    let app = app::build_app(&config).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}{}", addr, app::API_PREFIX);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}
