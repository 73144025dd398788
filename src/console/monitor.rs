//! Process lifecycle monitor
//!
//! Waits for the child to terminate, then delivers the last buffered
//! lines and an exit notice. Runs alongside the readers and never reads
//! process output itself.

use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::buffer::LogBuffer;
use super::flusher::flush_pass;
use super::process::ProcessHandle;
use super::sink::SinkHandle;
use super::types::LINE_TERMINATOR;

/// Spawn the waiter task. On exit it disables the kill affordance,
/// flushes whatever is still buffered (no line ceiling), and appends the
/// terminal notice. A failed wait skips the notice entirely.
pub fn spawn_monitor(
    mut process: Box<dyn ProcessHandle>,
    buffer: LogBuffer,
    sink: SinkHandle,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let exit_code = match process.wait().await {
            Ok(code) => code,
            Err(e) => {
                debug!(error = %e, "process wait interrupted, skipping exit notice");
                return;
            }
        };
        info!(exit_code, "child process exited");

        sink.set_kill_enabled(false);
        flush_pass(&buffer, &sink, usize::MAX);
        sink.append_batch(format!(
            "Process exited with code {}{}",
            exit_code, LINE_TERMINATOR
        ));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::types::SinkCommand;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use tokio::sync::oneshot;

    struct FakeProcess {
        rx: Option<oneshot::Receiver<i32>>,
    }

    #[async_trait]
    impl ProcessHandle for FakeProcess {
        async fn wait(&mut self) -> Result<i32> {
            let rx = self.rx.take().ok_or_else(|| anyhow!("already waited"))?;
            rx.await.map_err(|_| anyhow!("wait interrupted"))
        }
    }

    fn fake_process() -> (Box<dyn ProcessHandle>, oneshot::Sender<i32>) {
        let (tx, rx) = oneshot::channel();
        (Box::new(FakeProcess { rx: Some(rx) }), tx)
    }

    #[tokio::test]
    async fn test_final_flush_then_exit_notice() {
        let buffer = LogBuffer::new(1024);
        buffer.push("l1".to_string());
        buffer.push("l2".to_string());
        buffer.push("l3".to_string());
        let (sink, mut rx) = SinkHandle::test_pair();
        let (process, exit_tx) = fake_process();

        let handle = spawn_monitor(process, buffer.clone(), sink);
        exit_tx.send(7).unwrap();
        handle.await.unwrap();

        // Kill control goes dark before anything else is delivered.
        assert_eq!(rx.try_recv().unwrap(), SinkCommand::SetKillEnabled(false));
        assert_eq!(
            rx.try_recv().unwrap(),
            SinkCommand::AppendBatch("l1\nl2\nl3\n".to_string())
        );
        assert_eq!(rx.try_recv().unwrap(), SinkCommand::ScrollToEnd);
        assert_eq!(
            rx.try_recv().unwrap(),
            SinkCommand::AppendBatch("Process exited with code 7\n".to_string())
        );
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn test_empty_buffer_skips_the_batch() {
        let buffer = LogBuffer::new(1024);
        let (sink, mut rx) = SinkHandle::test_pair();
        let (process, exit_tx) = fake_process();

        let handle = spawn_monitor(process, buffer, sink);
        exit_tx.send(0).unwrap();
        handle.await.unwrap();

        assert_eq!(rx.try_recv().unwrap(), SinkCommand::SetKillEnabled(false));
        assert_eq!(
            rx.try_recv().unwrap(),
            SinkCommand::AppendBatch("Process exited with code 0\n".to_string())
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_interrupted_wait_delivers_nothing() {
        let buffer = LogBuffer::new(1024);
        buffer.push("pending".to_string());
        let (sink, mut rx) = SinkHandle::test_pair();
        let (process, exit_tx) = fake_process();

        let handle = spawn_monitor(process, buffer.clone(), sink);
        drop(exit_tx);
        handle.await.unwrap();

        assert!(rx.try_recv().is_err());
        assert_eq!(buffer.len(), 1);
    }
}
