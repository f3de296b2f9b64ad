use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments of the server
#[derive(Parser, Debug)]
#[command(name = "miniftpd", about = "A minimal FTP server written in Rust.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Control port, overrides the configuration
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Accounts file, overrides the configuration
    #[arg(short, long)]
    pub accounts: Option<PathBuf>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}

/// Command-line arguments of the client
#[derive(Parser, Debug)]
#[command(name = "miniftp", about = "A minimal FTP client written in Rust.")]
pub struct ClientCli {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, default_value_t = crate::constants::DEFAULT_LISTEN_PORT)]
    pub port: u16,

    #[arg(short, long)]
    pub user: String,

    #[arg(short = 'P', long, default_value = "")]
    pub password: String,

    /// Remote directory to change into before running the command
    #[arg(long)]
    pub cwd: Option<String>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: ClientCommand,
}

#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    /// List the remote working directory
    Ls,
    /// Print the remote working directory
    Pwd,
    /// Download a remote file
    Get {
        remote: String,
        /// Local destination, defaults to the remote file name
        local: Option<PathBuf>,
    },
    /// Upload a local file
    Put {
        local: PathBuf,
        /// Remote destination, defaults to the local file name
        remote: Option<String>,
    },
    /// Create a remote directory
    Mkdir { path: String },
    /// Remove an empty remote directory
    Rmdir { path: String },
    /// Delete a remote file
    Rm { path: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_overrides() {
        let cli = Cli::parse_from(["miniftpd", "--port", "2222", "-a", "etc/other.txt", "-v"]);
        assert_eq!(cli.port, Some(2222));
        assert_eq!(cli.accounts, Some(PathBuf::from("etc/other.txt")));
        assert!(cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_client_get_subcommand() {
        let cli = ClientCli::parse_from([
            "miniftp", "--user", "alice", "--password", "secret", "get", "readme.txt",
        ]);
        assert_eq!(cli.port, 2121);
        assert!(matches!(
            cli.command,
            ClientCommand::Get { ref remote, local: None } if remote == "readme.txt"
        ));
    }
}
