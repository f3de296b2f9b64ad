use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use miniftpd::core_cli::{ClientCli, ClientCommand};
use miniftpd::core_client::FtpClient;
use std::io::Write;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let args = ClientCli::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
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

    let mut client = FtpClient::connect((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("Failed to connect to {}:{}", args.host, args.port))?;
    client
        .login(&args.user, &args.password)
        .await
        .context("Login failed")?;

    if let Some(dir) = &args.cwd {
        client
            .cwd(dir)
            .await
            .with_context(|| format!("Failed to change directory to {}", dir))?;
    }

    match args.command {
        ClientCommand::Ls => {
            let listing = client.list().await.context("LIST failed")?;
            std::io::stdout().write_all(&listing)?;
        }
        ClientCommand::Pwd => {
            println!("{}", client.pwd().await.context("PWD failed")?);
        }
        ClientCommand::Get { remote, local } => {
            let data = client
                .retrieve(&remote)
                .await
                .with_context(|| format!("Failed to retrieve {}", remote))?;
            let local = local.unwrap_or_else(|| default_local_name(&remote));
            tokio::fs::write(&local, &data)
                .await
                .with_context(|| format!("Failed to write {:?}", local))?;
            println!("{} bytes written to {}", data.len(), local.display());
        }
        ClientCommand::Put { local, remote } => {
            let data = tokio::fs::read(&local)
                .await
                .with_context(|| format!("Failed to read {:?}", local))?;
            let remote = match remote {
                Some(remote) => remote,
                None => local
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .with_context(|| format!("No file name in {:?}", local))?,
            };
            client
                .store(&remote, &data)
                .await
                .with_context(|| format!("Failed to store {}", remote))?;
            println!("{} bytes stored as {}", data.len(), remote);
        }
        ClientCommand::Mkdir { path } => {
            let created = client
                .mkd(&path)
                .await
                .with_context(|| format!("Failed to create {}", path))?;
            println!("{}", created);
        }
        ClientCommand::Rmdir { path } => {
            client
                .rmd(&path)
                .await
                .with_context(|| format!("Failed to remove {}", path))?;
        }
        ClientCommand::Rm { path } => {
            client
                .dele(&path)
                .await
                .with_context(|| format!("Failed to delete {}", path))?;
        }
    }

    client.quit().await.context("QUIT failed")?;
    Ok(())
}

fn default_local_name(remote: &str) -> std::path::PathBuf {
    let name = remote.rsplit(['/', '\\']).next().unwrap_or(remote);
    Path::new(if name.is_empty() { "download" } else { name }).to_path_buf()
}
