// src/core_ftpcommand/pwd.rs
use crate::core_ftpcommand::handlers::Flow;
use crate::core_ftpcommand::responses;
use crate::session::Session;

/// Handles the PWD (Print Working Directory) FTP command.
///
/// The working directory is shown relative to the account root, `/` for
/// the root itself.
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
pub async fn handle_pwd_command(
    session: &mut Session,
    _arg: Option<String>,
) -> Result<Flow, std::io::Error> {
    let response = responses::current_directory(&session.display_working_dir());
    session.send_response(&response).await?;
    Ok(Flow::Continue)
}
