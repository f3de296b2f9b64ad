pub mod config;
pub mod constants;
pub mod core_auth;
pub mod core_cli;
pub mod core_client;
pub mod core_error;
pub mod core_fs;
pub mod core_ftpcommand;
pub mod core_network;
pub mod server;
pub mod session;

pub use config::Config;
