use crate::core_error::FtpError;
use crate::core_ftpcommand::handlers::Flow;
use crate::core_ftpcommand::responses;
use crate::core_ftpcommand::utils::{copy_with_timeout, resolve_path_argument};
use crate::session::Session;
use log::{debug, error, info, warn};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Handles the RETR (Retrieve) FTP command.
///
/// The target is checked and opened before the data connection is accepted,
/// so a bad path leaves the pending passive listener in place.
///
/// # Arguments
///
/// * `session` - The client session.
/// * `arg` - The file to send.
///
/// # Returns
///
/// `Flow::Continue`. `Err` only if the control connection fails; every
/// other failure is answered with a reply.
pub async fn handle_retr_command(
    session: &mut Session,
    arg: Option<String>,
) -> Result<Flow, std::io::Error> {
    let Some(file_path) = resolve_path_argument(session, "RETR", arg).await? else {
        return Ok(Flow::Continue);
    };

    let mut file = match File::open(&file_path).await {
        Ok(file) => file,
        Err(e) => {
            warn!("Failed to open file {:?}: {}", file_path, e);
            session.send_response(responses::FILE_UNAVAILABLE).await?;
            return Ok(Flow::Continue);
        }
    };
    let is_file = file
        .metadata()
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false);
    if !is_file {
        warn!("RETR target is not a regular file: {:?}", file_path);
        session.send_response(responses::FILE_UNAVAILABLE).await?;
        return Ok(Flow::Continue);
    }

    let mut data_stream = match session.open_data_connection().await {
        Ok(stream) => stream,
        Err(e) => {
            session.send_error(&e).await?;
            return Ok(Flow::Continue);
        }
    };
    session.send_response(responses::OPEN_DATA_CONN).await?;

    let deadline = session.config.server.data_timeout();
    let buffer_size = session.config.server.download_buffer_size;
    match copy_with_timeout(&mut file, &mut data_stream, buffer_size, deadline).await {
        Ok(bytes) => {
            if let Err(e) = data_stream.shutdown().await {
                debug!("Data connection shutdown failed: {}", e);
            }
            info!("File {:?} sent, {} bytes", file_path, bytes);
            session.send_response(responses::CLOSING_DATA_CONN).await?;
        }
        Err(e) => {
            error!("Failed to send file {:?}: {}", file_path, e);
            session.send_error(&FtpError::Transfer(e)).await?;
        }
    }

    Ok(Flow::Continue)
}
