//! Popup engine server — campaign management API plus the public tracking
//! and eligibility endpoints for the storefront host.

use clap::Parser;
use popup_api::popup_router;
use popup_core::config::AppConfig;
use popup_core::PopupResult;
use popup_store::PopupStore;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "popup-server")]
#[command(about = "Storefront popup campaign management and delivery API")]
#[command(version)]
struct Cli {
    /// HTTP port (overrides config)
    #[arg(long, env = "POPUP_ENGINE__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Seed demo campaigns at startup
    #[arg(long, default_value_t = false)]
    seed: bool,
}

#[tokio::main]
async fn main() -> PopupResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "popup_server=info,popup_api=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Popup server starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }

    info!(
        host = %config.api.host,
        http_port = config.api.http_port,
        "Configuration loaded"
    );

    let store = Arc::new(PopupStore::new());
    if cli.seed || config.delivery.seed_demo_data {
        store.seed_demo_data();
    }

    let app = popup_router(store);

    let addr = format!("{}:{}", config.api.host, config.api.http_port);
    info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
