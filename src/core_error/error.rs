// Error taxonomy for command handling. Every variant maps onto one control reply.
use crate::core_ftpcommand::responses;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FtpError {
    #[error("Missing or malformed argument for {0}")]
    Syntax(&'static str),

    #[error("Command not implemented: {0}")]
    NotImplemented(String),

    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(String),

    #[error("Unknown user or wrong password")]
    LoginInvalid,

    #[error("Command requires a logged-in session")]
    NotLoggedIn,

    #[error("PASS received without a preceding USER")]
    BadSequence,

    #[error("Path escapes the account root: {0}")]
    AccessDenied(String),

    #[error("File unavailable: {0}")]
    FileUnavailable(String),

    #[error("No passive listener pending")]
    NoPassiveListener,

    #[error("Data connection not established within {0:?}")]
    DataTimeout(Duration),

    #[error("Failed to open data connection: {0}")]
    DataConnection(#[source] std::io::Error),

    #[error("Transfer aborted: {0}")]
    Transfer(#[source] std::io::Error),
}

impl FtpError {
    pub fn to_ftp_response(&self) -> &'static str {
        match self {
            FtpError::Syntax(_) => responses::SYNTAX_ERROR,
            FtpError::NotImplemented(_) => responses::NOT_IMPLEMENTED,
            FtpError::UnsupportedParameter(_) => responses::INVALID_PARAMETER,
            FtpError::LoginInvalid => responses::LOGIN_INVALID,
            FtpError::NotLoggedIn => responses::NEED_LOGIN,
            FtpError::BadSequence => responses::BAD_SEQUENCE,
            FtpError::AccessDenied(_) => responses::ACCESS_DENIED,
            FtpError::FileUnavailable(_) => responses::FILE_UNAVAILABLE,
            FtpError::NoPassiveListener
            | FtpError::DataTimeout(_)
            | FtpError::DataConnection(_) => responses::CANT_OPEN_DATA,
            FtpError::Transfer(_) => responses::LOCAL_ERROR,
        }
    }
}
