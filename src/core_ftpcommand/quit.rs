use crate::core_ftpcommand::handlers::Flow;
use crate::core_ftpcommand::responses;
use crate::session::Session;
use log::info;

/// Handles the QUIT FTP command.
///
/// Logs the session out, acknowledges, and tells the session loop to close
/// the control connection once the reply is flushed.
///
/// # Arguments
///
/// * `session` - The client session.
/// * `_arg` - Ignored.
///
/// # Returns
///
/// `Flow::Quit` once the 221 reply is written. `Err` only if the control
/// connection fails.
pub async fn handle_quit_command(
    session: &mut Session,
    _arg: Option<String>,
) -> Result<Flow, std::io::Error> {
    info!(
        "Received QUIT command from {}. Closing connection.",
        session.username().unwrap_or("anonymous client")
    );
    session.logout();
    session.send_response(responses::QUIT_SUCCESS).await?;
    Ok(Flow::Quit)
}
