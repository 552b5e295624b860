//! Child process that hosts the tool's MCP server.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use crate::base::error::{Error, Result};
use crate::infra::config::ToolCommand;

/// Owns the tool process. stderr is inherited for diagnostics; stdin/stdout
/// are piped and handed to the MCP transport via [`ToolProcess::take_stdio`].
#[derive(Debug)]
pub struct ToolProcess {
    child: Child,
    command: ToolCommand,
}

impl ToolProcess {
    /// Spawns `command`. Must be called inside a tokio runtime context.
    pub fn spawn(command: &ToolCommand) -> Result<Self> {
        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::ProcessStart {
                command: command.to_string(),
                source,
            })?;
        tracing::info!(command = %command, pid = ?child.id(), "spawned tool process");
        Ok(Self {
            child,
            command: command.clone(),
        })
    }

    /// Takes the (stdout, stdin) pair: the transport reads the child's
    /// stdout and writes to its stdin. Only succeeds once.
    pub fn take_stdio(&mut self) -> Result<(ChildStdout, ChildStdin)> {
        let missing = |which: &str| Error::ProcessStart {
            command: self.command.to_string(),
            source: std::io::Error::other(format!("{which} pipe not available")),
        };
        let stdout = self.child.stdout.take().ok_or_else(|| missing("stdout"))?;
        let stdin = self.child.stdin.take().ok_or_else(|| missing("stdin"))?;
        Ok((stdout, stdin))
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Whether the process is still running, as far as a non-blocking check can tell.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Kills the process and briefly waits for it to be reaped.
    pub async fn terminate(&mut self) -> std::io::Result<()> {
        if !self.is_running() {
            return Ok(());
        }
        self.child.start_kill()?;
        let _ = tokio::time::timeout(Duration::from_millis(500), self.child.wait()).await;
        tracing::debug!(command = %self.command, "tool process terminated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_executable_is_process_start_failure() {
        let cmd = ToolCommand::maestro("maestro-binary-that-does-not-exist");
        let err = ToolProcess::spawn(&cmd).unwrap_err();
        match err {
            Error::ProcessStart { command, source } => {
                assert_eq!(command, "maestro-binary-that-does-not-exist mcp");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stdio_is_taken_once_and_terminate_is_repeatable() {
        let mut proc = ToolProcess::spawn(&ToolCommand::new("sleep", ["30"])).unwrap();
        assert!(proc.is_running());
        assert!(proc.take_stdio().is_ok());
        assert!(proc.take_stdio().is_err());

        proc.terminate().await.unwrap();
        assert!(!proc.is_running());
        proc.terminate().await.unwrap();
    }
}
