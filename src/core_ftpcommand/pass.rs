use crate::core_auth::helper::verify_password;
use crate::core_error::FtpError;
use crate::core_ftpcommand::handlers::Flow;
use crate::core_ftpcommand::responses;
use crate::session::{LoginState, Session};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

/// Handles the PASS FTP command.
///
/// Requires an account bound by USER. On a matching password the account root
/// is resolved against `users_root` and must be an existing directory; it
/// becomes both the root and the working directory of the session.
///
/// # Arguments
///
/// * `session` - The client session.
/// * `arg` - The password sent by the client.
///
/// # Returns
///
/// `Flow::Continue`. `Err` only if the control connection fails; every
/// other failure is answered with a reply.
pub async fn handle_pass_command(
    session: &mut Session,
    arg: Option<String>,
) -> Result<Flow, std::io::Error> {
    let pending = match session.state() {
        LoginState::AwaitingPassword(account) => Some(account.clone()),
        _ => None,
    };
    let Some(account) = pending else {
        warn!("PASS received without a pending USER");
        session.send_error(&FtpError::BadSequence).await?;
        return Ok(Flow::Continue);
    };

    let password = arg.unwrap_or_default();
    let stored = account.get_password().to_string();
    let password_ok = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .unwrap_or_else(|e| {
            error!("Password check task failed: {}", e);
            false
        });
    if !password_ok {
        warn!("Wrong password for user {}", account.get_username());
        session.logout();
        session.send_error(&FtpError::LoginInvalid).await?;
        return Ok(Flow::Continue);
    }

    let root = session
        .config
        .server
        .users_root
        .join(account.get_root_folder());

    match resolve_root(&root).await {
        Some(root_path) => {
            info!("Password accepted for user {}", account.get_username());
            session.complete_login(account, root_path);
            session.send_response(responses::LOGIN_SUCCESS).await?;
        }
        None => {
            error!(
                "Root folder for user {} is missing: {:?}",
                account.get_username(),
                root
            );
            session.logout();
            session.send_response(responses::ROOT_FOLDER_MISSING).await?;
        }
    }

    Ok(Flow::Continue)
}

/// Canonical form of the account root, if it is an existing directory.
async fn resolve_root(root: &Path) -> Option<PathBuf> {
    let canonical = tokio::fs::canonicalize(root).await.ok()?;
    let metadata = tokio::fs::metadata(&canonical).await.ok()?;
    metadata.is_dir().then_some(canonical)
}
