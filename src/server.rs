use crate::config::Config;
use crate::core_auth::AccountStore;
use crate::core_network::network;
use anyhow::Result;
use log::{error, info};
use std::sync::Arc;

/// Runs the FTP server until the control listener fails.
///
/// # Arguments
///
/// * `config` - The server configuration.
/// * `accounts` - Accounts loaded at startup, shared read-only by every session.
pub async fn run(config: Config, accounts: AccountStore) -> Result<()> {
    info!("Starting server with config: {:?}", config);
    info!("{} account(s) loaded", accounts.len());

    if let Err(e) = network::start_server(Arc::new(config), Arc::new(accounts)).await {
        error!("Server stopped: {:#}", e);
        return Err(e);
    }

    Ok(())
}
