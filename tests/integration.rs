use miniftpd::core_auth::AccountStore;
use miniftpd::core_client::{ClientError, FtpClient};
use miniftpd::core_network::network::serve;
use miniftpd::Config;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::{TcpListener, TcpStream};

struct TestServer {
    addr: SocketAddr,
    temp: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("alicehome/empty")).unwrap();
        std::fs::write(temp.path().join("alicehome/readme.txt"), b"0123456789").unwrap();
        std::fs::write(temp.path().join("secret.txt"), b"outside").unwrap();

        let mut config = Config::default();
        config.server.users_root = temp.path().to_path_buf();
        config.server.data_timeout_secs = 5;
        let accounts = AccountStore::parse("alice secret alicehome\n");

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, Arc::new(config), Arc::new(accounts)));

        Self { addr, temp }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    async fn alice(&self) -> FtpClient {
        let mut client = FtpClient::connect(self.addr).await.unwrap();
        client.login("alice", "secret").await.unwrap();
        client
    }
}

fn code(result: Result<impl Sized, ClientError>) -> u16 {
    match result {
        Ok(_) => panic!("expected a failure reply"),
        Err(e) => e.reply_code().unwrap_or_else(|| panic!("no reply code: {}", e)),
    }
}

#[tokio::test]
async fn test_alice_downloads_readme() {
    let server = TestServer::start().await;
    let mut client = FtpClient::connect(server.addr).await.unwrap();

    assert_eq!(client.command("USER alice").await.unwrap().code, 331);
    assert_eq!(client.command("PASS secret").await.unwrap().code, 230);
    assert_eq!(client.pwd().await.unwrap(), "/");

    let data = client.retrieve("readme.txt").await.unwrap();
    assert_eq!(data, b"0123456789");

    client.quit().await.unwrap();
}

#[tokio::test]
async fn test_unknown_user_then_pass() {
    let server = TestServer::start().await;
    let mut client = FtpClient::connect(server.addr).await.unwrap();

    assert_eq!(client.command("USER bob").await.unwrap().code, 430);
    assert_eq!(client.command("PASS anything").await.unwrap().code, 503);
    assert_eq!(client.command("PWD").await.unwrap().code, 530);
}

#[tokio::test]
async fn test_store_then_retrieve_round_trips() {
    let server = TestServer::start().await;
    let mut client = server.alice().await;
    let payload: Vec<u8> = (0..300_000u32).map(|i| (i * 7 % 256) as u8).collect();

    client.store("upload.bin", &payload).await.unwrap();
    assert_eq!(
        std::fs::read(server.root().join("alicehome/upload.bin")).unwrap(),
        payload
    );
    assert_eq!(client.retrieve("upload.bin").await.unwrap(), payload);

    client.store("upload.bin", b"short").await.unwrap();
    assert_eq!(client.retrieve("upload.bin").await.unwrap(), b"short");
}

#[tokio::test]
async fn test_list_of_empty_directory_sends_nothing() {
    let server = TestServer::start().await;
    let mut client = server.alice().await;

    client.cwd("empty").await.unwrap();
    assert!(client.list().await.unwrap().is_empty());

    client.cdup().await.unwrap();
    let listing = String::from_utf8(client.list().await.unwrap()).unwrap();
    let lines: Vec<&str> = listing.split_terminator("\r\n").collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('d') && lines[0].ends_with(" empty"));
    assert!(lines[1].starts_with('-') && lines[1].ends_with(" readme.txt"));
    assert!(lines[1].contains("         10 "));
}

#[tokio::test]
async fn test_second_pasv_closes_first_listener() {
    let server = TestServer::start().await;
    let mut client = server.alice().await;

    let first = client.pasv().await.unwrap();
    let second = client.pasv().await.unwrap();
    // The OS may hand the freed port straight back.
    if first != second {
        assert!(TcpStream::connect(first).await.is_err());
    }

    let _data = TcpStream::connect(second).await.unwrap();
}

#[tokio::test]
async fn test_privileged_commands_before_login() {
    let server = TestServer::start().await;
    let mut client = FtpClient::connect(server.addr).await.unwrap();

    for line in ["MKD made", "DELE readme.txt", "STOR x.bin", "CWD empty", "LIST"] {
        assert_eq!(client.command(line).await.unwrap().code, 530, "{}", line);
    }
    assert!(!server.root().join("alicehome/made").exists());
    assert!(server.root().join("alicehome/readme.txt").exists());
}

#[tokio::test]
async fn test_traversal_is_denied() {
    let server = TestServer::start().await;
    let mut client = server.alice().await;

    assert_eq!(code(client.retrieve("../secret.txt").await), 550);
    assert_eq!(code(client.cwd("..\\..").await), 550);
    assert_eq!(code(client.dele("/../secret.txt").await), 550);
    assert_eq!(code(client.mkd("../../escape").await), 550);
    assert_eq!(code(client.store("../escape.bin", b"x").await), 550);
    assert_eq!(code(client.store("/..\\x", b"x").await), 550);
    assert_eq!(code(client.rmd("..").await), 550);
    assert_eq!(code(client.cdup().await), 550);

    assert!(server.root().join("secret.txt").exists());
    assert!(!server.root().join("escape.bin").exists());
    assert!(!server.root().join("x").exists());
    assert!(!server.root().join("escape").exists());
    assert_eq!(client.pwd().await.unwrap(), "/");
}

#[tokio::test]
async fn test_directory_lifecycle() {
    let server = TestServer::start().await;
    let mut client = server.alice().await;

    assert_eq!(client.mkd("a/b").await.unwrap(), "/a/b");
    client.cwd("/a/b").await.unwrap();
    assert_eq!(client.pwd().await.unwrap(), "/a/b");
    client.store("note.txt", b"hi").await.unwrap();

    client.cwd("/").await.unwrap();
    assert_eq!(code(client.rmd("a/b").await), 550);
    client.dele("a/b/note.txt").await.unwrap();
    client.rmd("a/b").await.unwrap();
    assert!(!server.root().join("alicehome/a/b").exists());
}

#[tokio::test]
async fn test_data_command_without_pasv_fails_fast() {
    let server = TestServer::start().await;
    let mut client = server.alice().await;

    let reply = tokio::time::timeout(Duration::from_secs(2), client.command("RETR readme.txt"))
        .await
        .expect("server must not wait for an implicit data connection")
        .unwrap();
    assert_eq!(reply.code, 425);
}

#[tokio::test]
async fn test_transfer_type_selection() {
    let server = TestServer::start().await;
    let mut client = server.alice().await;

    client.type_("I").await.unwrap();
    client.type_("a").await.unwrap();
    assert_eq!(code(client.type_("E").await), 504);
    assert_eq!(client.retrieve("readme.txt").await.unwrap(), b"0123456789");
}
