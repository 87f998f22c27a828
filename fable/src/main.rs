#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use args::{Args, Command};
use clap::Parser;
use fable_audio::AudioService;
use fable_config::Config;
use fable_server::Server;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(listen) = args.listen {
        config.server.listen_address = Some(listen);
    }

    fable_telemetry::init(config.telemetry.as_ref())?;

    tracing::info!(
        config_path = %args.config.display(),
        "starting fable"
    );

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::RecoverStuck => recover_stuck(config).await,
        Command::SyncCloud => sync_cloud(config).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let server = Server::new(config).await?;

    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    server.serve(shutdown).await?;

    tracing::info!("fable stopped");
    Ok(())
}

async fn recover_stuck(config: Config) -> anyhow::Result<()> {
    let service = AudioService::from_config(&config).await?;
    let summary = service.recover_stuck().await?;

    tracing::info!(
        recovered = summary.recovered,
        local_fallback = summary.local_fallback,
        reset_failed = summary.reset_failed,
        "recovery complete"
    );
    Ok(())
}

async fn sync_cloud(config: Config) -> anyhow::Result<()> {
    let service = AudioService::from_config(&config).await?;
    let summary = service.sync_cloud().await?;

    tracing::info!(
        migrated = summary.migrated,
        failed = summary.failed,
        missing_files = summary.missing_files,
        "cloud sync complete"
    );
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
