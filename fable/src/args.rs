use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fable narration service
#[derive(Debug, Parser)]
#[command(name = "fable", about = "Chapter narration service for the Fable platform")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "fable.toml", env = "FABLE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "FABLE_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Reconcile chapters stuck in `processing` after an interrupted run
    RecoverStuck,
    /// Migrate completed chapters with local audio to cloud storage
    SyncCloud,
}
