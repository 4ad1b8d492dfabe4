mod auth;
mod capture;
mod config;
mod inject;
mod routes;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;

use crate::capture::ScrotCapturer;
use crate::config::{Cli, ServerConfig};
use crate::inject::XdotoolInjector;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Default to INFO when RUST_LOG is not set.
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli)?;
    info!(
        listen_addr = %config.listen_addr,
        users = config.credentials.len(),
        "starting ctrltk server"
    );

    let ServerConfig {
        listen_addr,
        credentials,
    } = config;
    let state = AppState::new(credentials, ScrotCapturer::new(), XdotoolInjector);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .context("failed to bind listener")?;
    info!("ctrltk listening on {}", listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server shutdown with error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
}
