use crate::core_ftpcommand::handlers::Flow;
use crate::core_ftpcommand::responses;
use crate::session::Session;
use log::{info, warn};
use tokio::fs;

/// Handles the CDUP (Change to Parent Directory) FTP command.
///
/// Moving up from the account root is refused, not clamped.
///
/// # Arguments
///
/// * `session` - The client session.
/// * `_arg` - Ignored.
///
/// # Returns
///
/// `Flow::Continue`. `Err` only if the control connection fails; every
/// other failure is answered with a reply.
pub async fn handle_cdup_command(
    session: &mut Session,
    _arg: Option<String>,
) -> Result<Flow, std::io::Error> {
    let parent = session.resolver().parent();
    let new_dir = match parent {
        Ok(dir) => dir,
        Err(e) => {
            warn!("CDUP refused at {}", session.display_working_dir());
            session.send_error(&e).await?;
            return Ok(Flow::Continue);
        }
    };

    let is_dir = fs::metadata(&new_dir)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);

    if !is_dir {
        warn!("Failed to change directory to: {:?}", new_dir);
        session.send_response(responses::FILE_UNAVAILABLE).await?;
        return Ok(Flow::Continue);
    }

    session.working_dir = new_dir;
    info!(
        "Directory successfully changed to: {}",
        session.display_working_dir()
    );
    session.send_response(responses::COMMAND_OKAY).await?;
    Ok(Flow::Continue)
}
