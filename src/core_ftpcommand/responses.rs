// Control replies, written without the trailing CRLF.

pub const WELCOME: &str = "220 Service ready for new user.";
pub const NEED_PASSWORD: &str = "331 User name okay, need password.";
pub const LOGIN_SUCCESS: &str = "230 User logged in, proceed.";
pub const LOGIN_INVALID: &str = "430 Invalid username/password.";
pub const BAD_SEQUENCE: &str = "503 Bad sequence of commands.";
pub const QUIT_SUCCESS: &str = "221 Service closing control connection.";
pub const CONTROL_TIMEOUT: &str = "421 Control connection timed out, closing.";

pub const NEED_LOGIN: &str = "530 Not logged in.";

pub const SYSTEM_INFO: &str = "215 UNIX Type: L8";

pub const COMMAND_OKAY: &str = "200 Command okay.";
pub const TYPE_I_SUCCESS: &str = "200 Switching to Binary mode.";
pub const TYPE_A_SUCCESS: &str = "200 Switching to ASCII mode.";
pub const DELETE_SUCCESS: &str = "250 Delete success.";
pub const CLOSING_DATA_CONN: &str = "226 Closing data connection. Requested file action successful.";
pub const OPEN_DATA_CONN: &str = "150 Opening data connection.";

pub const NOT_IMPLEMENTED: &str = "502 Command not implemented.";
pub const FILE_UNAVAILABLE: &str = "550 File unavailable.";
pub const ACCESS_DENIED: &str = "550 Access denied.";
pub const ROOT_FOLDER_MISSING: &str = "550 Root folder does not exist.";
pub const CANT_OPEN_DATA: &str = "425 Can't open data connection.";
pub const LOCAL_ERROR: &str = "451 Requested action aborted. Local error in processing.";
pub const INVALID_PARAMETER: &str = "504 Command not implemented for that parameter.";
pub const SYNTAX_ERROR: &str = "501 Syntax error in parameters or arguments.";

/// `257 "<path>" is the current directory.`
pub fn current_directory(display_path: &str) -> String {
    format!("257 \"{}\" is the current directory.", display_path)
}

/// `257 "<path>" directory created.`
pub fn directory_created(display_path: &str) -> String {
    format!("257 \"{}\" directory created.", display_path)
}
