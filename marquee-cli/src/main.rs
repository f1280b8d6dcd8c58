//! Marquee CLI - Command-line interface
//!
//! Provides command-line access to Marquee functionality.

mod commands;
mod render;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Find movies you'll enjoy without the hassle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = commands::handle_command(cli.command).await {
        error!(error = %e, "command failed");
        anyhow::bail!(e.user_message());
    }

    Ok(())
}
