use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bankapi_backend::{
    config::{load_settings, LogFormat, Settings},
    create_router, open_store,
    seed::seed_accounts,
    AppState,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "bankapi", about = "Account management API server", version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Register the demo accounts before serving
    #[arg(long)]
    seed: bool,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    match settings.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(Some(&cli.config)).context("failed to load configuration")?;
    init_tracing(&settings);
    tracing::debug!(?settings, "configuration loaded");

    let store = open_store(&settings)
        .await
        .context("failed to open account store")?;
    let bind_addr = settings.bind_addr;
    let state = Arc::new(AppState::new(store, settings).context("failed to build app state")?);

    if cli.seed {
        let seeded = seed_accounts(&state.service)
            .await
            .context("failed to seed demo accounts")?;
        tracing::info!(count = seeded.len(), "demo accounts seeded");
    }

    let app = create_router(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
