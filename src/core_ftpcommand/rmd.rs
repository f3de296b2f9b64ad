use crate::core_ftpcommand::handlers::Flow;
use crate::core_ftpcommand::responses;
use crate::core_ftpcommand::utils::resolve_path_argument;
use crate::session::Session;
use log::{error, info, warn};
use tokio::fs;

/// Handles the RMD (Remove Directory) FTP command.
///
/// Only empty directories are removed. The account root and any directory
/// holding the current working directory are refused.
///
/// # Arguments
///
/// * `session` - The client session.
/// * `arg` - The empty directory to remove.
///
/// # Returns
///
/// `Flow::Continue`. `Err` only if the control connection fails; every
/// other failure is answered with a reply.
pub async fn handle_rmd_command(
    session: &mut Session,
    arg: Option<String>,
) -> Result<Flow, std::io::Error> {
    let Some(dir_path) = resolve_path_argument(session, "RMD", arg).await? else {
        return Ok(Flow::Continue);
    };

    if dir_path == session.root_path || session.working_dir.starts_with(&dir_path) {
        warn!("Refusing to remove directory in use: {:?}", dir_path);
        session.send_response(responses::FILE_UNAVAILABLE).await?;
        return Ok(Flow::Continue);
    }

    let is_dir = fs::symlink_metadata(&dir_path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);
    if !is_dir {
        warn!("RMD target is not a directory: {:?}", dir_path);
        session.send_response(responses::FILE_UNAVAILABLE).await?;
        return Ok(Flow::Continue);
    }

    match fs::remove_dir(&dir_path).await {
        Ok(()) => {
            info!("Directory removed successfully: {:?}", dir_path);
            session.send_response(responses::DELETE_SUCCESS).await?;
        }
        Err(e) => {
            error!("Failed to remove directory: {:?}, error: {}", dir_path, e);
            session.send_response(responses::FILE_UNAVAILABLE).await?;
        }
    }

    Ok(Flow::Continue)
}
