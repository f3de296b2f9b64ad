use crate::core_ftpcommand::handlers::Flow;
use crate::core_ftpcommand::responses;
use crate::core_ftpcommand::utils::resolve_path_argument;
use crate::session::Session;
use log::{error, info, warn};
use tokio::fs;

/// Handles the DELE FTP command. Directories are left to RMD.
///
/// # Arguments
///
/// * `session` - The client session.
/// * `arg` - The file to delete.
///
/// # Returns
///
/// `Flow::Continue`. `Err` only if the control connection fails; every
/// other failure is answered with a reply.
pub async fn handle_dele_command(
    session: &mut Session,
    arg: Option<String>,
) -> Result<Flow, std::io::Error> {
    let Some(file_path) = resolve_path_argument(session, "DELE", arg).await? else {
        return Ok(Flow::Continue);
    };

    match fs::symlink_metadata(&file_path).await {
        Ok(metadata) if !metadata.is_dir() => {}
        Ok(_) => {
            warn!("DELE target is a directory: {:?}", file_path);
            session.send_response(responses::FILE_UNAVAILABLE).await?;
            return Ok(Flow::Continue);
        }
        Err(e) => {
            warn!("DELE target unavailable: {:?}, error: {}", file_path, e);
            session.send_response(responses::FILE_UNAVAILABLE).await?;
            return Ok(Flow::Continue);
        }
    }

    match fs::remove_file(&file_path).await {
        Ok(()) => {
            info!("File deleted successfully: {:?}", file_path);
            session.send_response(responses::DELETE_SUCCESS).await?;
        }
        Err(e) => {
            error!("Failed to delete file: {:?}, error: {}", file_path, e);
            session.send_response(responses::FILE_UNAVAILABLE).await?;
        }
    }

    Ok(Flow::Continue)
}
