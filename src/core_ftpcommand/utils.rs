use crate::core_error::FtpError;
use crate::session::Session;
use log::warn;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

/// Resolves a path argument inside the account root.
///
/// A missing argument or a path outside the root is answered on the control
/// connection here, in which case `None` is returned and the handler is done.
pub async fn resolve_path_argument(
    session: &mut Session,
    verb: &'static str,
    arg: Option<String>,
) -> io::Result<Option<PathBuf>> {
    let Some(arg) = arg else {
        warn!("{} command received with no arguments", verb);
        session.send_error(&FtpError::Syntax(verb)).await?;
        return Ok(None);
    };

    let resolved = session.resolver().resolve(&arg).await;
    match resolved {
        Ok(path) => Ok(Some(path)),
        Err(e) => {
            session.send_error(&e).await?;
            Ok(None)
        }
    }
}

/// Copies `reader` into `writer` until EOF. Every read, write and the final
/// flush must finish within `deadline`.
pub async fn copy_with_timeout<R, W>(
    reader: &mut R,
    writer: &mut W,
    buffer_size: usize,
    deadline: Duration,
) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0; buffer_size.max(1)];
    let mut total = 0u64;

    loop {
        let bytes_read = timeout(deadline, reader.read(&mut buffer))
            .await
            .map_err(|_| timed_out("read"))??;
        if bytes_read == 0 {
            break;
        }

        timeout(deadline, writer.write_all(&buffer[..bytes_read]))
            .await
            .map_err(|_| timed_out("write"))??;
        total += bytes_read as u64;
    }

    timeout(deadline, writer.flush())
        .await
        .map_err(|_| timed_out("flush"))??;

    Ok(total)
}

fn timed_out(operation: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::TimedOut,
        format!("data {} timed out", operation),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_copy_moves_every_byte() {
        let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let mut reader: &[u8] = &payload;
        let mut sink = Vec::new();

        let copied = copy_with_timeout(&mut reader, &mut sink, 7, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(copied, payload.len() as u64);
        assert_eq!(sink, payload);
    }

    #[tokio::test]
    async fn test_copy_times_out_on_silent_peer() {
        let (mut silent, _keep_open) = tokio::io::duplex(64);
        let mut sink = Vec::new();

        let result =
            copy_with_timeout(&mut silent, &mut sink, 64, Duration::from_millis(50)).await;

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::TimedOut);
    }
}
