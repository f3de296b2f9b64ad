use crate::core_error::FtpError;
use crate::core_ftpcommand::handlers::Flow;
use crate::core_ftpcommand::responses;
use crate::core_ftpcommand::utils::{copy_with_timeout, resolve_path_argument};
use crate::session::Session;
use log::{error, info, warn};
use tokio::fs::{self, File};

/// Handles the STOR (Store) FTP command.
///
/// The destination is created or truncated once the data connection is up;
/// everything the client sends until it closes the connection is written.
///
/// # Arguments
///
/// * `session` - The client session.
/// * `arg` - The destination file, overwritten if it exists.
///
/// # Returns
///
/// `Flow::Continue`. `Err` only if the control connection fails; every
/// other failure is answered with a reply.
pub async fn handle_stor_command(
    session: &mut Session,
    arg: Option<String>,
) -> Result<Flow, std::io::Error> {
    let Some(file_path) = resolve_path_argument(session, "STOR", arg).await? else {
        return Ok(Flow::Continue);
    };

    let is_dir = fs::metadata(&file_path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);
    if is_dir {
        warn!("STOR destination is a directory: {:?}", file_path);
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

    let mut file = match File::create(&file_path).await {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to create file {:?}: {}", file_path, e);
            session.send_response(responses::FILE_UNAVAILABLE).await?;
            return Ok(Flow::Continue);
        }
    };

    let deadline = session.config.server.data_timeout();
    let buffer_size = session.config.server.upload_buffer_size;
    match copy_with_timeout(&mut data_stream, &mut file, buffer_size, deadline).await {
        Ok(bytes) => {
            info!("File {:?} stored, {} bytes", file_path, bytes);
            session.send_response(responses::CLOSING_DATA_CONN).await?;
        }
        Err(e) => {
            error!("Failed to store file {:?}: {}", file_path, e);
            session.send_error(&FtpError::Transfer(e)).await?;
        }
    }

    Ok(Flow::Continue)
}
