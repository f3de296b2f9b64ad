use crate::core_ftpcommand::handlers::Flow;
use crate::core_ftpcommand::responses;
use crate::core_ftpcommand::utils::resolve_path_argument;
use crate::session::Session;
use log::{info, warn};
use tokio::fs;

/// Handles the CWD (Change Working Directory) FTP command.
///
/// The target must stay inside the account root and be an existing
/// directory.
///
/// # Arguments
///
/// * `session` - The client session.
/// * `arg` - The directory to enter, absolute from the account root or
///   relative to the working directory.
///
/// # Returns
///
/// `Flow::Continue`. `Err` only if the control connection fails; every
/// other failure is answered with a reply.
pub async fn handle_cwd_command(
    session: &mut Session,
    arg: Option<String>,
) -> Result<Flow, std::io::Error> {
    let Some(dir_path) = resolve_path_argument(session, "CWD", arg).await? else {
        return Ok(Flow::Continue);
    };

    let is_dir = fs::metadata(&dir_path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);

    if is_dir {
        session.working_dir = dir_path;
        info!(
            "Directory successfully changed to: {}",
            session.display_working_dir()
        );
        session.send_response(responses::COMMAND_OKAY).await?;
    } else {
        warn!("Failed to change directory to: {:?}", dir_path);
        session.send_response(responses::FILE_UNAVAILABLE).await?;
    }
    Ok(Flow::Continue)
}
