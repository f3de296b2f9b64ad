use crate::core_error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::parser::Command;
use crate::core_ftpcommand::responses;
use crate::core_ftpcommand::{
    cdup, cwd, dele, list, mkd, pass, pwd, quit, retr, rmd, stor, syst, type_, user,
};
use crate::core_network::pasv;
use crate::session::Session;
use log::{debug, warn};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// What the session loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub type HandlerFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Flow, std::io::Error>> + Send + 'a>>;

/// A handler's `Err` means the control connection itself failed; every other
/// failure is answered on the control line and yields `Ok`.
type CommandHandler = for<'a> fn(&'a mut Session, Option<String>) -> HandlerFuture<'a>;

pub fn initialize_command_handlers() -> HashMap<FtpCommand, CommandHandler> {
    let mut handlers: HashMap<FtpCommand, CommandHandler> = HashMap::new();

    handlers.insert(FtpCommand::USER, |session, arg| {
        Box::pin(user::handle_user_command(session, arg))
    });
    handlers.insert(FtpCommand::PASS, |session, arg| {
        Box::pin(pass::handle_pass_command(session, arg))
    });
    handlers.insert(FtpCommand::QUIT, |session, arg| {
        Box::pin(quit::handle_quit_command(session, arg))
    });
    handlers.insert(FtpCommand::SYST, |session, arg| {
        Box::pin(syst::handle_syst_command(session, arg))
    });
    handlers.insert(FtpCommand::PWD, |session, arg| {
        Box::pin(pwd::handle_pwd_command(session, arg))
    });
    handlers.insert(FtpCommand::CWD, |session, arg| {
        Box::pin(cwd::handle_cwd_command(session, arg))
    });
    handlers.insert(FtpCommand::CDUP, |session, arg| {
        Box::pin(cdup::handle_cdup_command(session, arg))
    });
    handlers.insert(FtpCommand::PASV, |session, arg| {
        Box::pin(pasv::handle_pasv_command(session, arg))
    });
    handlers.insert(FtpCommand::LIST, |session, arg| {
        Box::pin(list::handle_list_command(session, arg))
    });
    handlers.insert(FtpCommand::RETR, |session, arg| {
        Box::pin(retr::handle_retr_command(session, arg))
    });
    handlers.insert(FtpCommand::STOR, |session, arg| {
        Box::pin(stor::handle_stor_command(session, arg))
    });
    handlers.insert(FtpCommand::DELE, |session, arg| {
        Box::pin(dele::handle_dele_command(session, arg))
    });
    handlers.insert(FtpCommand::RMD, |session, arg| {
        Box::pin(rmd::handle_rmd_command(session, arg))
    });
    handlers.insert(FtpCommand::MKD, |session, arg| {
        Box::pin(mkd::handle_mkd_command(session, arg))
    });
    handlers.insert(FtpCommand::TYPE, |session, arg| {
        Box::pin(type_::handle_type_command(session, arg))
    });

    handlers
}

/// Routes parsed commands through the login gate to their handlers.
pub struct CommandDispatcher {
    handlers: HashMap<FtpCommand, CommandHandler>,
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: initialize_command_handlers(),
        }
    }

    pub async fn handle(
        &self,
        command: Option<Command>,
        session: &mut Session,
    ) -> Result<Flow, std::io::Error> {
        let Some(command) = command else {
            session.send_response(responses::NOT_IMPLEMENTED).await?;
            return Ok(Flow::Continue);
        };

        let handler = FtpCommand::from_str(&command.verb)
            .and_then(|verb| self.handlers.get(&verb).map(|handler| (verb, *handler)));

        let Some((verb, handler)) = handler else {
            warn!("Unknown command: {}", command.verb);
            session
                .send_error(&FtpError::NotImplemented(command.verb))
                .await?;
            return Ok(Flow::Continue);
        };

        if verb.requires_login() && !session.is_authenticated() {
            debug!("Refusing {:?} before login", verb);
            session.send_error(&FtpError::NotLoggedIn).await?;
            return Ok(Flow::Continue);
        }

        handler(session, command.argument).await
    }
}
