use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stockstats::application::{Cli, CommandExecutor};
use stockstats::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Priority: --log-level > RUST_LOG > "info"
    let filter = match &args.log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    // Logs go to stderr so stdout carries only the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Priority: CLI args > environment > config file > defaults
    let config = Config::load(args.config.as_deref())?;

    CommandExecutor::execute(args, config).await?;
    Ok(())
}
