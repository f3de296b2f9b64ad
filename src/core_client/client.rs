use crate::core_client::error::ClientError;
use crate::core_client::response::Reply;
use log::{debug, trace};
use std::net::{IpAddr, SocketAddr};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

pub type ClientResult<T> = Result<T, ClientError>;

/// Async client for the control/data protocol the server speaks.
///
/// Every data command opens a fresh passive connection first, so callers never
/// issue PASV themselves.
pub struct FtpClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    peer_ip: IpAddr,
}

impl FtpClient {
    /// Connects and consumes the `220` greeting.
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> ClientResult<Self> {
        let stream = TcpStream::connect(addr).await?;
        let peer_ip = stream.peer_addr()?.ip();
        let (read_half, write_half) = stream.into_split();
        let mut client = Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            peer_ip,
        };

        let greeting = client.read_reply().await?;
        expect_code(greeting, 220)?;
        debug!("Connected to {}", peer_ip);
        Ok(client)
    }

    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<()> {
        let reply = self.command(&format!("USER {}", username)).await?;
        expect_code(reply, 331)?;

        self.send_line(&format!("PASS {}", password)).await?;
        trace!("CC OUT: PASS ****");
        let reply = self.read_reply().await?;
        expect_code(reply, 230)?;
        Ok(())
    }

    /// Sends one raw control line and returns the reply, whatever its code.
    pub async fn command(&mut self, line: &str) -> ClientResult<Reply> {
        self.send_line(line).await?;
        trace!("CC OUT: {}", line);
        self.read_reply().await
    }

    pub async fn read_reply(&mut self) -> ClientResult<Reply> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Err(ClientError::ConnectionClosed);
        }
        trace!("CC IN: {}", line.trim_end());
        line.parse()
    }

    pub async fn pwd(&mut self) -> ClientResult<String> {
        let reply = expect_code(self.command("PWD").await?, 257)?;
        reply
            .quoted_path()
            .map(str::to_string)
            .ok_or_else(|| ClientError::BadReply(reply.to_string()))
    }

    pub async fn cwd(&mut self, path: &str) -> ClientResult<()> {
        expect_code(self.command(&format!("CWD {}", path)).await?, 200)?;
        Ok(())
    }

    pub async fn cdup(&mut self) -> ClientResult<()> {
        expect_code(self.command("CDUP").await?, 200)?;
        Ok(())
    }

    /// Creates a directory and returns the path the server reports.
    pub async fn mkd(&mut self, path: &str) -> ClientResult<String> {
        let reply = expect_code(self.command(&format!("MKD {}", path)).await?, 257)?;
        Ok(reply
            .quoted_path()
            .map(str::to_string)
            .unwrap_or_else(|| path.to_string()))
    }

    pub async fn rmd(&mut self, path: &str) -> ClientResult<()> {
        expect_code(self.command(&format!("RMD {}", path)).await?, 250)?;
        Ok(())
    }

    pub async fn dele(&mut self, path: &str) -> ClientResult<()> {
        expect_code(self.command(&format!("DELE {}", path)).await?, 250)?;
        Ok(())
    }

    pub async fn type_(&mut self, transfer_type: &str) -> ClientResult<()> {
        expect_code(self.command(&format!("TYPE {}", transfer_type)).await?, 200)?;
        Ok(())
    }

    /// Requests a passive listener and returns the address to connect to.
    /// An unspecified advertised address is replaced by the control peer's.
    pub async fn pasv(&mut self) -> ClientResult<SocketAddr> {
        let reply = expect_code(self.command("PASV").await?, 227)?;
        let advertised = reply.passive_address()?;
        let ip = if advertised.ip().is_unspecified() {
            self.peer_ip
        } else {
            IpAddr::V4(*advertised.ip())
        };
        Ok(SocketAddr::new(ip, advertised.port()))
    }

    /// Raw bytes of the working directory listing.
    pub async fn list(&mut self) -> ClientResult<Vec<u8>> {
        self.download("LIST").await
    }

    pub async fn retrieve(&mut self, path: &str) -> ClientResult<Vec<u8>> {
        self.download(&format!("RETR {}", path)).await
    }

    pub async fn store(&mut self, path: &str, data: &[u8]) -> ClientResult<()> {
        let data_addr = self.pasv().await?;
        let mut data_stream = TcpStream::connect(data_addr).await?;

        let reply = self.command(&format!("STOR {}", path)).await?;
        expect_code(reply, 150)?;

        data_stream.write_all(data).await?;
        data_stream.shutdown().await?;
        drop(data_stream);

        expect_code(self.read_reply().await?, 226)?;
        debug!("Stored {} bytes at {}", data.len(), path);
        Ok(())
    }

    pub async fn quit(mut self) -> ClientResult<()> {
        expect_code(self.command("QUIT").await?, 221)?;
        Ok(())
    }

    async fn download(&mut self, command: &str) -> ClientResult<Vec<u8>> {
        let data_addr = self.pasv().await?;
        let mut data_stream = TcpStream::connect(data_addr).await?;

        expect_code(self.command(command).await?, 150)?;

        let mut data = Vec::new();
        data_stream.read_to_end(&mut data).await?;
        drop(data_stream);

        expect_code(self.read_reply().await?, 226)?;
        debug!("{} transferred {} bytes", command, data.len());
        Ok(data)
    }

    async fn send_line(&mut self, line: &str) -> ClientResult<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

fn expect_code(reply: Reply, code: u16) -> ClientResult<Reply> {
    if reply.code == code {
        Ok(reply)
    } else {
        Err(ClientError::Unexpected(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Plays back canned replies, one per line received after the greeting.
    async fn scripted_server(replies: &'static [&'static str]) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = socket.into_split();
            let mut reader = BufReader::new(read_half);
            write_half.write_all(b"220 ready\r\n").await.unwrap();
            for reply in replies {
                let mut line = String::new();
                if reader.read_line(&mut line).await.unwrap() == 0 {
                    return;
                }
                write_half.write_all(reply.as_bytes()).await.unwrap();
                write_half.write_all(b"\r\n").await.unwrap();
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_login_and_pwd() {
        let addr = scripted_server(&[
            "331 need password",
            "230 logged in",
            "257 \"/docs\" is the current directory.",
        ])
        .await;
        let mut client = FtpClient::connect(addr).await.unwrap();
        client.login("alice", "secret").await.unwrap();
        assert_eq!(client.pwd().await.unwrap(), "/docs");
    }

    #[tokio::test]
    async fn test_rejected_login_reports_code() {
        let addr = scripted_server(&["430 Invalid username/password."]).await;
        let mut client = FtpClient::connect(addr).await.unwrap();
        let err = client.login("bob", "x").await.unwrap_err();
        assert_eq!(err.reply_code(), Some(430));
    }

    #[tokio::test]
    async fn test_unspecified_pasv_address_uses_peer() {
        let addr = scripted_server(&["227 Entering Passive Mode (0,0,0,0,4,1)."]).await;
        let mut client = FtpClient::connect(addr).await.unwrap();
        let data_addr = client.pasv().await.unwrap();
        assert_eq!(data_addr, "127.0.0.1:1025".parse().unwrap());
    }
}
