use crate::core_error::FtpError;
use crate::core_ftpcommand::handlers::Flow;
use crate::core_ftpcommand::responses;
use crate::session::Session;
use log::{info, warn};

/// Handles the USER FTP command.
///
/// A known username is bound to the session, still offline until PASS
/// succeeds. An unknown or missing username leaves the session unbound; any
/// previous login of this session is dropped either way.
///
/// # Arguments
///
/// * `session` - The client session.
/// * `arg` - The username; a missing name is treated as unknown.
///
/// # Returns
///
/// `Flow::Continue`. `Err` only if the control connection fails; every
/// other failure is answered with a reply.
pub async fn handle_user_command(
    session: &mut Session,
    arg: Option<String>,
) -> Result<Flow, std::io::Error> {
    let account = arg
        .as_deref()
        .and_then(|username| session.accounts.find(username));

    match account {
        Some(account) => {
            info!("Username accepted: {}", account.get_username());
            session.bind_account(account);
            session.send_response(responses::NEED_PASSWORD).await?;
        }
        None => {
            warn!("Rejected unknown username: {:?}", arg.unwrap_or_default());
            session.logout();
            session.send_error(&FtpError::LoginInvalid).await?;
        }
    }

    Ok(Flow::Continue)
}
