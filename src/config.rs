use crate::constants::{
    DEFAULT_ACCOUNTS_FILE, DEFAULT_CONTROL_TIMEOUT_SECS, DEFAULT_DATA_TIMEOUT_SECS,
    DEFAULT_DOWNLOAD_BUFFER_SIZE, DEFAULT_LISTEN_PORT, DEFAULT_UPLOAD_BUFFER_SIZE,
    DEFAULT_USERS_ROOT,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub listen_port: u16,
    /// Address advertised in PASV replies; the control connection's local address when unset.
    pub pasv_address: Option<Ipv4Addr>,
    pub accounts_file: PathBuf,
    /// Relative account root folders are resolved against this directory.
    pub users_root: PathBuf,
    pub control_timeout_secs: u64,
    pub data_timeout_secs: u64,
    pub upload_buffer_size: usize,
    pub download_buffer_size: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from("0.0.0.0"),
            listen_port: DEFAULT_LISTEN_PORT,
            pasv_address: None,
            accounts_file: PathBuf::from(DEFAULT_ACCOUNTS_FILE),
            users_root: PathBuf::from(DEFAULT_USERS_ROOT),
            control_timeout_secs: DEFAULT_CONTROL_TIMEOUT_SECS,
            data_timeout_secs: DEFAULT_DATA_TIMEOUT_SECS,
            upload_buffer_size: DEFAULT_UPLOAD_BUFFER_SIZE,
            download_buffer_size: DEFAULT_DOWNLOAD_BUFFER_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn control_timeout(&self) -> Duration {
        Duration::from_secs(self.control_timeout_secs)
    }

    pub fn data_timeout(&self) -> Duration {
        Duration::from_secs(self.data_timeout_secs)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_address, self.listen_port)
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).context("Failed to parse configuration")?;

        // Zero-sized buffers would stall every transfer.
        if config.server.upload_buffer_size == 0 {
            config.server.upload_buffer_size = DEFAULT_UPLOAD_BUFFER_SIZE;
        }
        if config.server.download_buffer_size == 0 {
            config.server.download_buffer_size = DEFAULT_DOWNLOAD_BUFFER_SIZE;
        }

        Ok(config)
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))
    }
}
