use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use coffeeco_backend::{config::load_settings, router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// CoffeeCo web server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Port to listen on, overriding the configured bind address
    #[arg(long)]
    port: Option<u16>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize configuration
    let mut settings = load_settings(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(port) = cli.port {
        settings.bind_addr.set_port(port);
    }
    if cli.debug {
        settings.log_level = "debug".to_string();
    }
    settings.validate()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Create application state; the database stays open until the state is dropped
    let addr = settings.bind_addr;
    let state = Arc::new(AppState::from_settings(settings)?);

    let app = router::create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
