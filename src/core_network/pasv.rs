use crate::core_error::FtpError;
use crate::core_ftpcommand::handlers::Flow;
use crate::session::Session;
use log::{debug, error, info, warn};
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

/// A passive-mode listener waiting for exactly one data connection.
///
/// Owning the listener is owning the port: dropping a `PassiveListener`
/// (replaced by a newer PASV, or at session cleanup) closes the socket, and
/// [`PassiveListener::accept`] consumes it.
#[derive(Debug)]
pub struct PassiveListener {
    listener: TcpListener,
    advertised: SocketAddrV4,
}

impl PassiveListener {
    /// Binds an ephemeral port on `bind_ip` and records the address to
    /// advertise to the client.
    pub async fn open(bind_ip: IpAddr, advertised_ip: Ipv4Addr) -> io::Result<Self> {
        let listener = TcpListener::bind((bind_ip, 0)).await?;
        let port = listener.local_addr()?.port();
        let advertised = SocketAddrV4::new(advertised_ip, port);
        debug!(
            "PASV listener set up on IP: {}, Port: {}, advertised as {}",
            bind_ip, port, advertised
        );
        Ok(Self {
            listener,
            advertised,
        })
    }

    pub fn advertised(&self) -> SocketAddrV4 {
        self.advertised
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// `227 Entering Passive Mode (a,b,c,d,p1,p2).`
    pub fn pasv_response(&self) -> String {
        format_pasv_response(self.advertised)
    }

    /// Waits for the client's data connection, giving up after `deadline`.
    pub async fn accept(self, deadline: Duration) -> Result<TcpStream, FtpError> {
        match timeout(deadline, self.listener.accept()).await {
            Ok(Ok((data_stream, addr))) => {
                debug!("Accepted data connection from: {}", addr);
                Ok(data_stream)
            }
            Ok(Err(e)) => {
                warn!("Failed to accept data connection: {}", e);
                Err(FtpError::DataConnection(e))
            }
            Err(_) => {
                warn!("No data connection within {:?}", deadline);
                Err(FtpError::DataTimeout(deadline))
            }
        }
    }
}

pub fn format_pasv_response(addr: SocketAddrV4) -> String {
    let [a, b, c, d] = addr.ip().octets();
    let port = addr.port();
    format!(
        "227 Entering Passive Mode ({},{},{},{},{},{}).",
        a,
        b,
        c,
        d,
        port / 256,
        port % 256
    )
}

/// Picks the IPv4 address to advertise: the configured override, else the
/// control connection's local address when it is (or maps to) IPv4.
pub fn advertised_ipv4(configured: Option<Ipv4Addr>, local_ip: IpAddr) -> Option<Ipv4Addr> {
    if configured.is_some() {
        return configured;
    }
    match local_ip {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(ip) => ip.to_ipv4_mapped(),
    }
}

/// Handles the PASV FTP command.
///
/// The previous unconsumed listener is closed before the new one is bound, so
/// a session never holds two open passive ports.
///
/// # Arguments
///
/// * `session` - The client session; its local address is the bind address.
/// * `_arg` - Ignored.
///
/// # Returns
///
/// `Flow::Continue`. A bind failure or a missing IPv4 address is answered
/// with 425.
pub async fn handle_pasv_command(
    session: &mut Session,
    _arg: Option<String>,
) -> Result<Flow, io::Error> {
    session.discard_passive();

    let local_ip = session.local_ip();
    let Some(advertised_ip) = advertised_ipv4(session.config.server.pasv_address, local_ip) else {
        warn!("No IPv4 address to advertise for control address {}", local_ip);
        session.send_error(&FtpError::NoPassiveListener).await?;
        return Ok(Flow::Continue);
    };

    match PassiveListener::open(local_ip, advertised_ip).await {
        Ok(listener) => {
            let response = listener.pasv_response();
            info!("Entering passive mode on {}", listener.advertised());
            session.set_passive(listener);
            session.send_response(&response).await?;
        }
        Err(e) => {
            error!("Failed to bind passive listener on {}: {}", local_ip, e);
            session.send_error(&FtpError::DataConnection(e)).await?;
        }
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn test_pasv_response_encoding() {
        let addr = SocketAddrV4::new(Ipv4Addr::new(192, 168, 0, 7), 50_123);
        assert_eq!(
            format_pasv_response(addr),
            "227 Entering Passive Mode (192,168,0,7,195,203)."
        );
        assert_eq!(195 * 256 + 203, 50_123);
    }

    #[test]
    fn test_advertised_address_selection() {
        let local = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let public = Ipv4Addr::new(203, 0, 113, 9);

        assert_eq!(advertised_ipv4(Some(public), local), Some(public));
        assert_eq!(advertised_ipv4(None, local), Some(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(
            advertised_ipv4(None, IpAddr::V6(Ipv4Addr::LOCALHOST.to_ipv6_mapped())),
            Some(Ipv4Addr::LOCALHOST)
        );
        assert_eq!(advertised_ipv4(None, IpAddr::V6(Ipv6Addr::LOCALHOST)), None);
    }

    #[tokio::test]
    async fn test_accept_yields_one_connection() {
        let listener = PassiveListener::open(IpAddr::V4(Ipv4Addr::LOCALHOST), Ipv4Addr::LOCALHOST)
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        assert_eq!(listener.advertised().port(), addr.port());

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(b"x").await.unwrap();
        });

        let stream = listener.accept(Duration::from_secs(5)).await;
        assert!(stream.is_ok());
        client.await.unwrap();
    }

    #[tokio::test]
    async fn test_accept_times_out() {
        let listener = PassiveListener::open(IpAddr::V4(Ipv4Addr::LOCALHOST), Ipv4Addr::LOCALHOST)
            .await
            .unwrap();
        let result = listener.accept(Duration::from_millis(50)).await;
        assert!(matches!(result, Err(FtpError::DataTimeout(_))));
    }

    #[tokio::test]
    async fn test_dropping_listener_closes_port() {
        let listener = PassiveListener::open(IpAddr::V4(Ipv4Addr::LOCALHOST), Ipv4Addr::LOCALHOST)
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        assert!(TcpStream::connect(addr).await.is_err());
    }
}
