use crate::core_client::response::Reply;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server closed the control connection")]
    ConnectionClosed,

    #[error("Malformed reply: {0}")]
    BadReply(String),

    #[error("Unexpected reply: {0}")]
    Unexpected(Reply),
}

impl ClientError {
    /// The server's reply code, when the failure was a well-formed reply.
    pub fn reply_code(&self) -> Option<u16> {
        match self {
            ClientError::Unexpected(reply) => Some(reply.code),
            _ => None,
        }
    }
}
