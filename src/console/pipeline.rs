//! Pipeline assembly
//!
//! Wires the four background units together around one shared buffer:
//! two stream readers feeding it, the batch flusher draining it, and the
//! lifecycle monitor finishing it off when the child exits.

use tokio::io::AsyncRead;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::ConsoleConfig;

use super::buffer::LogBuffer;
use super::flusher::{flush_pass, BatchFlusher};
use super::monitor::spawn_monitor;
use super::process::ProcessHandle;
use super::reader::{spawn_reader, StreamKind};
use super::sink::SinkHandle;

/// A running console pipeline for one child process.
pub struct ConsolePipeline {
    flusher_shutdown: CancellationToken,
    stdout_reader: JoinHandle<()>,
    stderr_reader: JoinHandle<()>,
    monitor: JoinHandle<()>,
    flusher: JoinHandle<()>,
    buffer: LogBuffer,
    sink: SinkHandle,
}

impl ConsolePipeline {
    /// Spawn readers, flusher, and monitor over the given streams and
    /// process handle. Output flows to `sink` from here on.
    pub fn launch<O, E>(
        stdout: O,
        stderr: E,
        process: Box<dyn ProcessHandle>,
        sink: SinkHandle,
        config: &ConsoleConfig,
    ) -> Self
    where
        O: AsyncRead + Unpin + Send + 'static,
        E: AsyncRead + Unpin + Send + 'static,
    {
        let buffer = LogBuffer::new(config.max_buffered_chars);
        let stdout_reader = spawn_reader(StreamKind::Stdout, stdout, buffer.clone());
        let stderr_reader = spawn_reader(StreamKind::Stderr, stderr, buffer.clone());

        let flusher_shutdown = CancellationToken::new();
        let flusher = BatchFlusher::new(buffer.clone(), sink.clone(), config)
            .spawn(flusher_shutdown.clone());
        let monitor = spawn_monitor(process, buffer.clone(), sink.clone());

        Self {
            flusher_shutdown,
            stdout_reader,
            stderr_reader,
            monitor,
            flusher,
            buffer,
            sink,
        }
    }

    /// Stop the periodic flush trigger. Readers and the monitor keep
    /// running; they exit on their own when their sources end.
    pub fn close(&self) {
        self.flusher_shutdown.cancel();
    }

    /// Lines currently waiting to be flushed.
    pub fn pending_lines(&self) -> usize {
        self.buffer.len()
    }

    /// Wait for both readers and the monitor to finish, then stop the
    /// flusher. The monitor has already delivered the final flush and
    /// exit notice by the time this resolves.
    pub async fn join(self) {
        let _ = self.stdout_reader.await;
        let _ = self.stderr_reader.await;
        let _ = self.monitor.await;
        self.flusher_shutdown.cancel();
        let _ = self.flusher.await;
        // A fast exit can beat the readers to the monitor's final
        // flush; deliver whatever straggled in after it.
        flush_pass(&self.buffer, &self.sink, usize::MAX);
    }
}
