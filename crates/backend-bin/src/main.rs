mod logging;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use authgate_backend_lib::{
    auth::KEYGEN_HINT,
    config::Settings,
    error::StartupError,
    router::create_router,
    AppState,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Token-based authentication gateway
#[derive(Parser, Debug)]
#[command(name = "authgate", version)]
struct Cli {
    /// Settings file; `AUTHGATE_*` environment variables override it
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("failed to load settings")?;

    if let Some(bind) = cli.bind {
        settings.bind_addr = bind;
    }
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }

    logging::init_logging(&settings.log_level, settings.log_format);

    let state = match AppState::new(settings).await {
        Ok(state) => Arc::new(state),
        Err(err) => {
            error!(error = %err, "startup failed, not accepting connections");
            if matches!(err, StartupError::KeyMaterial(_)) {
                for command in KEYGEN_HINT {
                    warn!("provision keys with: {command}");
                }
            }
            return Err(err.into());
        }
    };

    if let Some(deny_list) = state.gateway.deny_list() {
        let every = Duration::from_secs(state.settings.revocation_sweep_secs);
        deny_list.spawn_sweeper(every);
        info!(every_secs = every.as_secs(), "revocation sweeper started");
    }

    let addr = state.settings.bind_addr;
    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
