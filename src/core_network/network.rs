use crate::config::Config;
use crate::constants::MAX_COMMAND_LENGTH;
use crate::core_auth::AccountStore;
use crate::core_ftpcommand::handlers::{CommandDispatcher, Flow};
use crate::core_ftpcommand::parser::{parse_command, Command};
use crate::core_ftpcommand::responses;
use crate::session::Session;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout};

const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

pub async fn start_server(config: Arc<Config>, accounts: Arc<AccountStore>) -> Result<()> {
    let listen_addr = config.server.listen_addr();
    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Failed to bind control listener on {}", listen_addr))?;
    info!("Server listening on {}", listener.local_addr()?);

    serve(listener, config, accounts).await
}

/// Accept loop. Every control connection runs in its own task; a failed
/// accept is logged and the loop keeps going.
pub async fn serve(
    listener: TcpListener,
    config: Arc<Config>,
    accounts: Arc<AccountStore>,
) -> Result<()> {
    let dispatcher = Arc::new(CommandDispatcher::new());

    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Failed to accept control connection: {}", e);
                // Back off on persistent failures such as EMFILE.
                sleep(ACCEPT_RETRY_DELAY).await;
                continue;
            }
        };
        info!("New connection from {:?}", addr);

        let config = Arc::clone(&config);
        let accounts = Arc::clone(&accounts);
        let dispatcher = Arc::clone(&dispatcher);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, config, accounts, dispatcher).await {
                error!("Connection error: {:?}", e);
            }
            info!("Connection closed for {:?}", addr);
        });
    }
}

pub async fn handle_connection(
    socket: TcpStream,
    config: Arc<Config>,
    accounts: Arc<AccountStore>,
    dispatcher: Arc<CommandDispatcher>,
) -> Result<()> {
    let local_ip = socket.local_addr()?.ip();
    let (read_half, write_half) = socket.into_split();
    let mut reader = BufReader::new(read_half);
    let control_timeout = config.server.control_timeout();
    let mut session = Session::new(accounts, config, Box::new(write_half), local_ip);

    session.send_response(responses::WELCOME).await?;

    let mut buffer = Vec::new();
    let result = loop {
        buffer.clear();
        let read = timeout(
            control_timeout,
            (&mut reader)
                .take(MAX_COMMAND_LENGTH)
                .read_until(b'\n', &mut buffer),
        )
        .await;

        let n = match read {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => break Err(e).context("Failed to read from control connection"),
            Err(_) => {
                info!("Control connection idle for {:?}, closing", control_timeout);
                if let Err(e) = session.send_response(responses::CONTROL_TIMEOUT).await {
                    debug!("Failed to send timeout notice: {}", e);
                }
                break Ok(());
            }
        };

        if n == 0 {
            info!("Client disconnected");
            break Ok(());
        }
        if !buffer.ends_with(b"\n") && n as u64 >= MAX_COMMAND_LENGTH {
            warn!("Command line exceeds {} bytes, closing", MAX_COMMAND_LENGTH);
            break Ok(());
        }

        // Non-UTF-8 bytes are replaced, the command still gets a reply.
        let line = String::from_utf8_lossy(&buffer);
        let command = parse_command(&line);
        log_command(command.as_ref());

        match dispatcher.handle(command, &mut session).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break Ok(()),
            Err(e) => break Err(e).context("Failed to write to control connection"),
        }
    };

    session.close().await;
    result
}

fn log_command(command: Option<&Command>) {
    match command {
        Some(command) if command.verb == "PASS" => debug!("Received command: PASS ****"),
        Some(command) => match &command.argument {
            Some(arg) => debug!("Received command: {} {}", command.verb, arg),
            None => debug!("Received command: {}", command.verb),
        },
        None => debug!("Received empty command"),
    }
}
