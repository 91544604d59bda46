//! Evidence Vault CLI - command-line interface for the evidence vault.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vault_cli::commands;
use vault_cli::repl;
use vault_cli::{Cli, Command, Config, Formatter};
use vault_sdk::{VaultClient, VaultPaths};

#[tokio::main]
async fn main() {
    // Log to stderr so table and JSON output stay clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> vault_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    let data_dir = config.resolve_data_dir(cli.data_dir.as_deref())?;
    tracing::debug!(data_dir = %data_dir.display(), "Opening vault");
    let client = VaultClient::open(VaultPaths::new(data_dir), config.store.clone())?;

    match cli.command {
        None | Some(Command::Repl) => repl::run_repl(&client, &config, &formatter).await?,
        Some(cmd) => commands::dispatch(cmd, &client, &config, &formatter).await?,
    }

    Ok(())
}
