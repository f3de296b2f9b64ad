use crate::core_error::FtpError;
use crate::core_ftpcommand::handlers::Flow;
use crate::core_ftpcommand::responses;
use crate::session::Session;
use log::debug;

/// Handles the TYPE FTP command.
///
/// ASCII (`A`) and image (`I`) are acknowledged. Transfers always move raw
/// bytes, so the selected type is not stored.
///
/// # Arguments
///
/// * `session` - The client session.
/// * `arg` - The representation type, `A` or `I`; a trailing form code is ignored.
///
/// # Returns
///
/// `Flow::Continue`. `Err` only if the control connection fails; every
/// other failure is answered with a reply.
pub async fn handle_type_command(
    session: &mut Session,
    arg: Option<String>,
) -> Result<Flow, std::io::Error> {
    let Some(arg) = arg else {
        session.send_error(&FtpError::Syntax("TYPE")).await?;
        return Ok(Flow::Continue);
    };

    let primary_type = arg
        .split_whitespace()
        .next()
        .map(|s| s.to_ascii_uppercase())
        .unwrap_or_default();
    debug!("TYPE requested: {}", arg);

    match primary_type.as_str() {
        "A" => session.send_response(responses::TYPE_A_SUCCESS).await?,
        "I" => session.send_response(responses::TYPE_I_SUCCESS).await?,
        _ => {
            session
                .send_error(&FtpError::UnsupportedParameter(arg))
                .await?
        }
    }
    Ok(Flow::Continue)
}
