//! Child process spawning and control
//!
//! Wraps a tokio child process behind the [`ProcessHandle`] trait the
//! lifecycle monitor consumes, and carries the forcible-termination
//! affordance for the glue layer (a kill button, Ctrl-C).

use std::process::Stdio;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Something that can be waited on for an exit code. The pipeline only
/// ever waits; termination goes through the handle's own kill switch.
#[async_trait]
pub trait ProcessHandle: Send {
    /// Block until the process terminates, returning its exit code.
    async fn wait(&mut self) -> Result<i32>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("spawn failed: {0}")]
    SpawnFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A spawned child with both output pipes captured.
pub struct SpawnedProcess {
    child: Child,
    kill_switch: CancellationToken,
}

impl SpawnedProcess {
    /// Token that forcibly terminates the child when cancelled, even
    /// while a wait is in progress.
    pub fn kill_switch(&self) -> CancellationToken {
        self.kill_switch.clone()
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }
}

#[async_trait]
impl ProcessHandle for SpawnedProcess {
    async fn wait(&mut self) -> Result<i32> {
        let mut kill_requested = false;
        loop {
            let exited = tokio::select! {
                status = self.child.wait() => Some(status),
                _ = self.kill_switch.cancelled(), if !kill_requested => None,
            };
            match exited {
                Some(status) => {
                    let status = status.context("failed to wait on child")?;
                    return Ok(status.code().unwrap_or(-1));
                }
                None => {
                    // Kill and keep waiting so the real exit status is
                    // still observed and reported.
                    kill_requested = true;
                    warn!(pid = ?self.child.id(), "forcibly terminating child process");
                    if let Err(e) = self.child.start_kill() {
                        warn!(error = %e, "failed to kill child process");
                    }
                }
            }
        }
    }
}

/// Spawn `program` with piped stdout/stderr, returning the handle and
/// both capture streams. The child owns no terminal; stdin is closed.
pub fn spawn_command(
    program: &str,
    args: &[String],
) -> Result<(SpawnedProcess, ChildStdout, ChildStderr), ProcessError> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .map_err(|e| ProcessError::SpawnFailed(format!("{program}: {e}")))?;
    info!(program, pid = ?child.id(), "child process spawned");

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| ProcessError::SpawnFailed("stdout was not captured".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| ProcessError::SpawnFailed("stderr was not captured".to_string()))?;

    Ok((
        SpawnedProcess {
            child,
            kill_switch: CancellationToken::new(),
        },
        stdout,
        stderr,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_failure_is_reported() {
        let err = spawn_command("definitely-not-a-real-binary-42", &[]).err().unwrap();
        assert!(matches!(err, ProcessError::SpawnFailed(_)));
    }
}
