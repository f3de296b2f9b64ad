use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use log::info;
use miniftpd::core_auth::AccountStore;
use miniftpd::core_cli::Cli;
use miniftpd::{server, Config};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format
    let default_level = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(&path.to_string_lossy())?,
        None => {
            info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    // CLI overrides
    if let Some(port) = args.port {
        config.server.listen_port = port;
    }
    if let Some(accounts_file) = args.accounts {
        config.server.accounts_file = accounts_file;
    }

    let accounts = AccountStore::load_from_file(&config.server.accounts_file)
        .with_context(|| {
            format!(
                "Failed to load accounts from {:?}",
                config.server.accounts_file
            )
        })?;

    server::run(config, accounts).await
}
