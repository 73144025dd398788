//! Display sink boundary
//!
//! All display mutations funnel through a single dispatch task, so the
//! flusher and the lifecycle monitor never race on the display even
//! though they run concurrently. A failed sink call is logged and
//! swallowed; it must not take down the pipeline.

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::types::SinkCommand;

/// The display consumer. Implementations are driven exclusively from the
/// dispatch task, one call at a time.
#[async_trait]
pub trait ConsoleSink: Send {
    /// Append a pre-joined batch of lines.
    async fn append_batch(&mut self, text: &str) -> Result<()>;
    /// Wipe all displayed content.
    async fn clear_all(&mut self) -> Result<()>;
    /// Position the view at the end of the content.
    async fn scroll_to_end(&mut self) -> Result<()>;
    /// Toggle the "kill process" affordance.
    async fn set_kill_enabled(&mut self, enabled: bool) -> Result<()>;
}

/// Cloneable, non-blocking sender side of the sink boundary.
#[derive(Debug, Clone)]
pub struct SinkHandle {
    tx: mpsc::UnboundedSender<SinkCommand>,
}

impl SinkHandle {
    pub fn append_batch(&self, text: String) {
        self.send(SinkCommand::AppendBatch(text));
    }

    pub fn clear_all(&self) {
        self.send(SinkCommand::ClearAll);
    }

    pub fn scroll_to_end(&self) {
        self.send(SinkCommand::ScrollToEnd);
    }

    pub fn set_kill_enabled(&self, enabled: bool) {
        self.send(SinkCommand::SetKillEnabled(enabled));
    }

    fn send(&self, cmd: SinkCommand) {
        if self.tx.send(cmd).is_err() {
            debug!("sink dispatcher gone, dropping display update");
        }
    }

    #[cfg(test)]
    pub(crate) fn test_pair() -> (Self, mpsc::UnboundedReceiver<SinkCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

/// Owns a [`ConsoleSink`] on a dedicated task and serializes every
/// display mutation onto it.
pub struct SinkDispatcher;

impl SinkDispatcher {
    /// Spawn the dispatch task. The task ends once every [`SinkHandle`]
    /// clone has been dropped and the queue is drained.
    pub fn spawn(mut sink: Box<dyn ConsoleSink>) -> (SinkHandle, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            while let Some(cmd) = rx.recv().await {
                let result = match cmd {
                    SinkCommand::AppendBatch(text) => sink.append_batch(&text).await,
                    SinkCommand::ClearAll => sink.clear_all().await,
                    SinkCommand::ScrollToEnd => sink.scroll_to_end().await,
                    SinkCommand::SetKillEnabled(enabled) => sink.set_kill_enabled(enabled).await,
                };
                if let Err(e) = result {
                    warn!(error = %e, "sink update failed, dropping it");
                }
            }
            debug!("sink dispatcher finished");
        });

        (SinkHandle { tx }, task)
    }
}

/// Sink that writes batches straight to the viewer's own stdout.
/// Terminals follow the tail on their own, so scrolling is a no-op.
pub struct TerminalSink {
    out: tokio::io::Stdout,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self {
            out: tokio::io::stdout(),
        }
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConsoleSink for TerminalSink {
    async fn append_batch(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn clear_all(&mut self) -> Result<()> {
        self.out.write_all(b"\x1b[2J\x1b[H").await?;
        Ok(())
    }

    async fn scroll_to_end(&mut self) -> Result<()> {
        Ok(())
    }

    async fn set_kill_enabled(&mut self, enabled: bool) -> Result<()> {
        debug!(enabled, "kill control toggled");
        Ok(())
    }
}
