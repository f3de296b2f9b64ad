// src/constants.rs

pub const DEFAULT_LISTEN_PORT: u16 = 2121;
pub const DEFAULT_ACCOUNTS_FILE: &str = "etc/accounts.txt";
pub const DEFAULT_USERS_ROOT: &str = "users";
pub const DEFAULT_CONTROL_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_DATA_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_UPLOAD_BUFFER_SIZE: usize = 256 * 1024;
pub const DEFAULT_DOWNLOAD_BUFFER_SIZE: usize = 128 * 1024;

/// Longest control line accepted, CRLF included.
pub const MAX_COMMAND_LENGTH: u64 = 4096;

/// LIST modification time, e.g. `Jan 05 13:37`.
pub const LIST_TIME_FORMAT: &str = "%b %d %H:%M";
