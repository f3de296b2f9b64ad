#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    SYST,
    PWD,
    LIST,
    CWD,
    CDUP,
    MKD,
    RMD,
    DELE,
    RETR,
    STOR,
    PASV,
    TYPE,
}

impl FtpCommand {
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "QUIT" => Some(FtpCommand::QUIT),
            "SYST" => Some(FtpCommand::SYST),
            "PWD" => Some(FtpCommand::PWD),
            "LIST" => Some(FtpCommand::LIST),
            "CWD" => Some(FtpCommand::CWD),
            "CDUP" => Some(FtpCommand::CDUP),
            "MKD" => Some(FtpCommand::MKD),
            "RMD" => Some(FtpCommand::RMD),
            "DELE" => Some(FtpCommand::DELE),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "PASV" => Some(FtpCommand::PASV),
            "TYPE" => Some(FtpCommand::TYPE),
            _ => None,
        }
    }

    /// USER, PASS and QUIT are the only verbs accepted before login.
    pub fn requires_login(self) -> bool {
        !matches!(self, FtpCommand::USER | FtpCommand::PASS | FtpCommand::QUIT)
    }
}
