use crate::core_client::error::ClientError;
use regex::Regex;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::str::FromStr;
use std::sync::OnceLock;

/// One single-line control reply, `NNN text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub code: u16,
    pub text: String,
}

impl Reply {
    /// Extracts the data address from a `227 Entering Passive Mode (a,b,c,d,p1,p2).` reply.
    pub fn passive_address(&self) -> Result<SocketAddrV4, ClientError> {
        let caps = pasv_regex()
            .captures(&self.text)
            .filter(|_| self.code == 227)
            .ok_or_else(|| ClientError::BadReply(self.to_string()))?;

        let mut fields = [0u8; 6];
        for (field, capture) in fields.iter_mut().zip(caps.iter().skip(1)) {
            let value = capture.map(|m| m.as_str()).unwrap_or_default();
            *field = value
                .parse()
                .map_err(|_| ClientError::BadReply(self.to_string()))?;
        }

        let [a, b, c, d, p1, p2] = fields;
        let port = (u16::from(p1) << 8) | u16::from(p2);
        Ok(SocketAddrV4::new(Ipv4Addr::new(a, b, c, d), port))
    }

    /// The path quoted in a 257 reply.
    pub fn quoted_path(&self) -> Option<&str> {
        let start = self.text.find('"')? + 1;
        let end = start + self.text[start..].find('"')?;
        Some(&self.text[start..end])
    }
}

fn pasv_regex() -> &'static Regex {
    static PASV_RE: OnceLock<Regex> = OnceLock::new();
    PASV_RE.get_or_init(|| {
        Regex::new(r"\((\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3})\)")
            .expect("PASV pattern is valid")
    })
}

impl FromStr for Reply {
    type Err = ClientError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let malformed = || ClientError::BadReply(line.to_string());

        let code_part = line.get(..3).ok_or_else(malformed)?;
        if !code_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let code = code_part.parse().map_err(|_| malformed())?;

        let text = match line.get(3..) {
            Some("") | None => String::new(),
            Some(rest) if rest.starts_with(' ') => rest[1..].to_string(),
            Some(_) => return Err(malformed()),
        };

        Ok(Reply { code, text })
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.text)
    }
}
