use crate::config::Config;
use crate::core_auth::{Account, AccountStore};
use crate::core_error::FtpError;
use crate::core_fs::PathResolver;
use crate::core_network::pasv::PassiveListener;
use log::{debug, info};
use std::io;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

/// Write side of the control connection.
pub type ControlWriter = Box<dyn AsyncWrite + Send + Unpin>;

#[derive(Debug, Clone)]
pub enum LoginState {
    Unauthenticated,
    AwaitingPassword(Arc<Account>),
    Authenticated(Arc<Account>),
}

/// Per-connection state. Commands of one session run strictly one after the
/// other, so nothing in here is shared or locked.
pub struct Session {
    pub accounts: Arc<AccountStore>,
    pub config: Arc<Config>,
    writer: ControlWriter,
    local_ip: IpAddr,
    state: LoginState,
    pub root_path: PathBuf,
    pub working_dir: PathBuf,
    passive: Option<PassiveListener>,
}

impl Session {
    pub fn new(
        accounts: Arc<AccountStore>,
        config: Arc<Config>,
        writer: ControlWriter,
        local_ip: IpAddr,
    ) -> Self {
        Self {
            accounts,
            config,
            writer,
            local_ip,
            state: LoginState::Unauthenticated,
            root_path: PathBuf::from("/"),
            working_dir: PathBuf::from("/"),
            passive: None,
        }
    }

    /// Writes one control reply followed by CRLF and flushes it.
    pub async fn send_response(&mut self, message: &str) -> io::Result<()> {
        debug!("Reply: {}", message);
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await
    }

    pub async fn send_error(&mut self, error: &FtpError) -> io::Result<()> {
        debug!("Command failed: {}", error);
        self.send_response(error.to_ftp_response()).await
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    pub fn local_ip(&self) -> IpAddr {
        self.local_ip
    }

    /// The session's own login token: logged in through this connection and
    /// the account is marked online.
    pub fn is_authenticated(&self) -> bool {
        matches!(&self.state, LoginState::Authenticated(account) if account.is_online())
    }

    pub fn current_account(&self) -> Option<&Arc<Account>> {
        match &self.state {
            LoginState::Unauthenticated => None,
            LoginState::AwaitingPassword(account) | LoginState::Authenticated(account) => {
                Some(account)
            }
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.current_account().map(|account| account.get_username())
    }

    /// Binds `account` awaiting its password. Any previous login is dropped first.
    pub fn bind_account(&mut self, account: Arc<Account>) {
        self.logout();
        self.state = LoginState::AwaitingPassword(account);
    }

    pub fn complete_login(&mut self, account: Arc<Account>, root_path: PathBuf) {
        account.mark_online();
        info!(
            "User {} logged in, root {:?}",
            account.get_username(),
            root_path
        );
        self.state = LoginState::Authenticated(account);
        self.working_dir = root_path.clone();
        self.root_path = root_path;
    }

    /// Returns to the unauthenticated state, releasing the online mark and any
    /// pending passive listener. Safe to call repeatedly.
    pub fn logout(&mut self) {
        let previous = std::mem::replace(&mut self.state, LoginState::Unauthenticated);
        if let LoginState::Authenticated(account) = previous {
            account.mark_offline();
            info!("User {} logged out", account.get_username());
        }
        self.passive = None;
        self.root_path = PathBuf::from("/");
        self.working_dir = PathBuf::from("/");
    }

    pub fn resolver(&self) -> PathResolver<'_> {
        PathResolver::new(&self.root_path, &self.working_dir)
    }

    /// Working directory as the client sees it.
    pub fn display_working_dir(&self) -> String {
        self.resolver().display_path(&self.working_dir)
    }

    /// Installs a new passive listener, closing any unconsumed one.
    pub fn set_passive(&mut self, listener: PassiveListener) {
        if let Some(previous) = self.passive.replace(listener) {
            debug!(
                "Closing unconsumed passive listener on {:?}",
                previous.local_addr().ok()
            );
        }
    }

    /// Closes the pending passive listener, if any.
    pub fn discard_passive(&mut self) {
        self.passive = None;
    }

    pub fn has_passive(&self) -> bool {
        self.passive.is_some()
    }

    /// Consumes the pending passive listener and waits for the client to
    /// connect, bounded by the configured data timeout.
    pub async fn open_data_connection(&mut self) -> Result<TcpStream, FtpError> {
        let listener = self.passive.take().ok_or(FtpError::NoPassiveListener)?;
        listener.accept(self.config.server.data_timeout()).await
    }

    /// Session teardown: logout, close the listener, shut the control writer.
    pub async fn close(&mut self) {
        self.logout();
        if let Err(e) = self.writer.shutdown().await {
            debug!("Control connection shutdown failed: {}", e);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.logout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn session_with(accounts: &str) -> Session {
        let (writer, _reader) = tokio::io::duplex(1024);
        Session::new(
            Arc::new(AccountStore::parse(accounts)),
            Arc::new(Config::default()),
            Box::new(writer),
            IpAddr::V4(Ipv4Addr::LOCALHOST),
        )
    }

    #[tokio::test]
    async fn test_login_and_logout_toggle_online() {
        let mut session = session_with("alice secret alicehome\n");
        let alice = session.accounts.find("alice").unwrap();

        session.bind_account(alice.clone());
        assert!(!session.is_authenticated());
        assert_eq!(session.username(), Some("alice"));

        session.complete_login(alice.clone(), PathBuf::from("/srv/alice"));
        assert!(session.is_authenticated());
        assert!(alice.is_online());
        assert_eq!(session.display_working_dir(), "/");

        session.logout();
        session.logout();
        assert!(!session.is_authenticated());
        assert!(!alice.is_online());
        assert!(session.current_account().is_none());
    }

    #[tokio::test]
    async fn test_drop_releases_online_mark() {
        let mut session = session_with("alice secret alicehome\n");
        let alice = session.accounts.find("alice").unwrap();
        session.complete_login(alice.clone(), PathBuf::from("/srv/alice"));
        drop(session);
        assert!(!alice.is_online());
    }

    #[tokio::test]
    async fn test_data_connection_requires_listener() {
        let mut session = session_with("");
        assert!(matches!(
            session.open_data_connection().await,
            Err(FtpError::NoPassiveListener)
        ));
    }

    #[tokio::test]
    async fn test_second_listener_replaces_first() {
        let mut session = session_with("");
        let first = PassiveListener::open(IpAddr::V4(Ipv4Addr::LOCALHOST), Ipv4Addr::LOCALHOST)
            .await
            .unwrap();
        let first_addr = first.local_addr().unwrap();
        session.set_passive(first);

        let second = PassiveListener::open(IpAddr::V4(Ipv4Addr::LOCALHOST), Ipv4Addr::LOCALHOST)
            .await
            .unwrap();
        session.set_passive(second);

        assert!(session.has_passive());
        assert!(TcpStream::connect(first_addr).await.is_err());
    }
}
