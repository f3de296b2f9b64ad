use crate::core_ftpcommand::handlers::Flow;
use crate::core_ftpcommand::responses;
use crate::core_ftpcommand::utils::resolve_path_argument;
use crate::session::Session;
use log::{error, info};
use tokio::fs;

/// Handles the MKD (Make Directory) FTP command.
///
/// Missing ancestors are created as well. Creating a directory that already
/// exists succeeds.
///
/// # Arguments
///
/// * `session` - The client session.
/// * `arg` - The directory to create.
///
/// # Returns
///
/// `Flow::Continue`. `Err` only if the control connection fails; every
/// other failure is answered with a reply.
pub async fn handle_mkd_command(
    session: &mut Session,
    arg: Option<String>,
) -> Result<Flow, std::io::Error> {
    let Some(dir_path) = resolve_path_argument(session, "MKD", arg).await? else {
        return Ok(Flow::Continue);
    };

    match fs::create_dir_all(&dir_path).await {
        Ok(()) => {
            info!("Directory created successfully: {:?}", dir_path);
            let shown = session.resolver().display_path(&dir_path);
            session
                .send_response(&responses::directory_created(&shown))
                .await?;
        }
        Err(e) => {
            error!("Failed to create directory: {:?}, error: {}", dir_path, e);
            session.send_response(responses::FILE_UNAVAILABLE).await?;
        }
    }

    Ok(Flow::Continue)
}
