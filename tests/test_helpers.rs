// tests/test_helpers.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

use procview::console::{ConsoleSink, ProcessHandle};

/// One recorded display mutation, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Append(String),
    Clear,
    Scroll,
    KillEnabled(bool),
}

/// Sink that forwards every call to a channel the test can await.
pub struct RecordingSink {
    tx: mpsc::UnboundedSender<SinkCall>,
}

pub fn recording_sink() -> (RecordingSink, mpsc::UnboundedReceiver<SinkCall>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (RecordingSink { tx }, rx)
}

#[async_trait]
impl ConsoleSink for RecordingSink {
    async fn append_batch(&mut self, text: &str) -> Result<()> {
        let _ = self.tx.send(SinkCall::Append(text.to_string()));
        Ok(())
    }

    async fn clear_all(&mut self) -> Result<()> {
        let _ = self.tx.send(SinkCall::Clear);
        Ok(())
    }

    async fn scroll_to_end(&mut self) -> Result<()> {
        let _ = self.tx.send(SinkCall::Scroll);
        Ok(())
    }

    async fn set_kill_enabled(&mut self, enabled: bool) -> Result<()> {
        let _ = self.tx.send(SinkCall::KillEnabled(enabled));
        Ok(())
    }
}

/// Process handle whose exit the test scripts through a oneshot.
/// Dropping the sender makes the wait fail, like an interrupted wait.
pub struct ScriptedProcess {
    rx: Option<oneshot::Receiver<i32>>,
}

pub fn scripted_process() -> (Box<dyn ProcessHandle>, oneshot::Sender<i32>) {
    let (tx, rx) = oneshot::channel();
    (Box::new(ScriptedProcess { rx: Some(rx) }), tx)
}

#[async_trait]
impl ProcessHandle for ScriptedProcess {
    async fn wait(&mut self) -> Result<i32> {
        let rx = self.rx.take().ok_or_else(|| anyhow!("already waited"))?;
        rx.await.map_err(|_| anyhow!("wait interrupted"))
    }
}

/// Await the next recorded sink call, with a generous timeout so a
/// stalled pipeline fails the test instead of hanging it.
pub async fn next_call(rx: &mut mpsc::UnboundedReceiver<SinkCall>) -> SinkCall {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a sink call")
        .expect("sink channel closed")
}
