use crate::core_error::FtpError;
use crate::core_fs::listing::list_directory;
use crate::core_ftpcommand::handlers::Flow;
use crate::core_ftpcommand::responses;
use crate::core_ftpcommand::utils::copy_with_timeout;
use crate::session::Session;
use log::{debug, error, info};
use tokio::io::AsyncWriteExt;

/// Handles the LIST FTP command.
///
/// The listing always covers the working directory; an argument is ignored.
///
/// # Arguments
///
/// * `session` - The client session.
/// * `arg` - Ignored apart from a debug log line.
///
/// # Returns
///
/// `Flow::Continue`. `Err` only if the control connection fails; every
/// other failure is answered with a reply.
pub async fn handle_list_command(
    session: &mut Session,
    arg: Option<String>,
) -> Result<Flow, std::io::Error> {
    if let Some(arg) = arg {
        debug!("Ignoring LIST argument: {}", arg);
    }

    let mut data_stream = match session.open_data_connection().await {
        Ok(stream) => stream,
        Err(e) => {
            session.send_error(&e).await?;
            return Ok(Flow::Continue);
        }
    };
    session.send_response(responses::OPEN_DATA_CONN).await?;

    let listing = match list_directory(&session.working_dir).await {
        Ok(listing) => listing,
        Err(e) => {
            error!("Failed to read directory {:?}: {}", session.working_dir, e);
            session.send_error(&FtpError::Transfer(e)).await?;
            return Ok(Flow::Continue);
        }
    };

    let deadline = session.config.server.data_timeout();
    let buffer_size = session.config.server.download_buffer_size;
    let mut bytes = listing.as_bytes();
    if let Err(e) = copy_with_timeout(&mut bytes, &mut data_stream, buffer_size, deadline).await {
        error!("Failed to send directory listing: {}", e);
        session.send_error(&FtpError::Transfer(e)).await?;
        return Ok(Flow::Continue);
    }

    if let Err(e) = data_stream.shutdown().await {
        debug!("Data connection shutdown failed: {}", e);
    }
    drop(data_stream);

    info!(
        "Directory listing sent for {}",
        session.display_working_dir()
    );
    session.send_response(responses::CLOSING_DATA_CONN).await?;
    Ok(Flow::Continue)
}
