use crate::core_ftpcommand::handlers::Flow;
use crate::core_ftpcommand::responses;
use crate::session::Session;
use log::info;

/// Handles the SYST (System) FTP command.
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
pub async fn handle_syst_command(
    session: &mut Session,
    _arg: Option<String>,
) -> Result<Flow, std::io::Error> {
    info!("Responding to SYST command with system type.");
    session.send_response(responses::SYSTEM_INFO).await?;
    Ok(Flow::Continue)
}
