pub mod client;
pub mod error;
pub mod response;

pub use client::FtpClient;
pub use error::ClientError;
pub use response::Reply;
