use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hugo_installer::cli::Cli;
use hugo_installer::command_handlers::dispatch::dispatch;
use hugo_installer::config::InstallerConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cfg = InstallerConfig::load(cli.config.as_deref())?;
    dispatch(cli.command, &cfg)?;
    Ok(())
}
