// Here's the list of the FTP commands implemented
pub mod cdup;
pub mod cwd;
pub mod dele;
pub mod list;
pub mod mkd;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod retr;
pub mod rmd;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;

// Verb table, parsing and dispatch
pub mod ftpcommand;
pub mod handlers;
pub mod parser;
pub mod responses;

// The utils and common functions are here
pub mod utils;
