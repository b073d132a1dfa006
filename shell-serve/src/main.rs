//! Local static file server for the site.

mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use shell::core::logger::Logger;
use shell::core::sink::ConsoleSink;
use shell::io::config::{CONFIG_FILE, load_config};
use shell::logging;
use tracing::info;

use crate::state::{AppState, logger_options};

#[derive(Parser)]
#[command(name = "shell-serve")]
#[command(about = "Serve the site locally")]
struct Args {
    /// Path to the shell configuration.
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Address to bind to (overrides `serve.bind`).
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides `serve.port`).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();

    let config = load_config(&args.config)
        .with_context(|| format!("load config {}", args.config.display()))?;
    let bind = args.bind.unwrap_or_else(|| config.serve.bind.clone());
    let port = args.port.unwrap_or(config.serve.port);

    let logger = Logger::new(logger_options(&config), ConsoleSink);
    let state = AppState::from_config(&config, logger);
    info!(roots = ?state.roots, "serving site");
    let app = routes::router(state.clone());

    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("parse bind address {bind}:{port}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    let local = listener.local_addr().context("read local address")?;
    state.info(
        "Local server started",
        json!({ "port": local.port(), "url": format!("http://{local}") }),
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("ctrl-c handler unavailable, serving until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
