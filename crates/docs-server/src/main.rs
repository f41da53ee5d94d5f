mod cache;
mod config;
mod content;
mod error;
mod parser;
mod paths;
mod scanner;
mod server;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::AppError;
use server::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting docs-server");

    let config = Config::from_env()?;
    info!(
        docs_root = %config.docs_root.display(),
        listen_addr = %config.listen_addr,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        cors_origin = config.cors_origin.as_deref().unwrap_or("*"),
        "configuration loaded"
    );
    if !config.docs_root.is_dir() {
        tracing::warn!(
            docs_root = %config.docs_root.display(),
            "documentation root missing, serving empty structure until it appears"
        );
    }

    let state = Arc::new(AppState::new(&config));
    let initial = state.structure.get().await;
    info!(
        sections = initial.sections.len(),
        total_files = initial.total_files,
        total_tutorials = initial.total_tutorials,
        "documentation scanned"
    );

    let app = server::router(state).layer(server::cors_layer(&config)?);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .map_err(AppError::from)?;
    info!(listen_addr = %config.listen_addr, "HTTP server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::from)?;

    info!("HTTP server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
