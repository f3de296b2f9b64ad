pub mod network;
pub mod pasv;
