mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("visitlog v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match cli.command {
        Commands::Fingerprint { signals } => commands::fingerprint(signals),
        Commands::Run {
            signals,
            host,
            store,
        } => commands::run(signals, host, store).await,
    }
}
