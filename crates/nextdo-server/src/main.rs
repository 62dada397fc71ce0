use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use nextdo_core::db::establish_connection;
use nextdo_server::{
    app::{build_router, AppState},
    config::{ServerConfig, DEFAULT_CONFIG_FILE},
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "nextdo-server", version, about = "Recurring task scheduler over HTTP")]
struct Cli {
    /// TOML config file; missing files are ignored
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Listen on this port instead of the configured one
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "nextdo_server=info,nextdo_core=info,tower_http=debug".into()
            }),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::load(Some(&cli.config)).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        ServerConfig::default()
    });
    if let Some(port) = cli.port {
        config.port = port;
    }

    info!(path = %config.dbfile, "opening SQLite database");
    let pool = establish_connection(&config.dbfile).await?;

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port).parse()?;
    let state = Arc::new(AppState::new(config, pool));
    if state.signer.is_none() {
        warn!("no password configured, task endpoints are open");
    }
    if let Some(dir) = state.config.static_dir() {
        info!(dir = %dir, "serving static files");
    }

    let router = build_router(state);

    info!(%addr, "nextdo server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("nextdo server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
