//! Line readers for child process output
//!
//! One reader task per stream. Each decodes UTF-8 lines off the raw pipe
//! and pushes them into the shared buffer. Read or decode failures end
//! that reader only; the stream is dropped (closed) when the task exits.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

use super::buffer::LogBuffer;

/// Which child stream a reader drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// Spawn a task that drains `stream` into `buffer` until end-of-input
/// or a read error.
pub fn spawn_reader<R>(kind: StreamKind, stream: R, buffer: LogBuffer) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => buffer.push(line),
                Ok(None) => {
                    debug!(stream = kind.as_str(), "stream closed, reader finished");
                    break;
                }
                Err(e) => {
                    debug!(stream = kind.as_str(), error = %e, "read failed, stopping reader");
                    break;
                }
            }
        }
    })
}
