//! Bot subprocess supervision via a shell command.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::BotProcess;

/// Runs the bot as a child of this process, started through `sh -c`.
///
/// Stopping is graceful first: SIGTERM, then a bounded wait, then
/// SIGKILL if the child ignored the request.
pub struct CommandBotProcess {
    command: String,
    grace: Duration,
    child: Option<Child>,
}

impl CommandBotProcess {
    pub fn new(command: impl Into<String>, grace: Duration) -> Self {
        Self {
            command: command.into(),
            grace,
            child: None,
        }
    }
}

#[async_trait]
impl BotProcess for CommandBotProcess {
    async fn start(&mut self) -> Result<(), DomainError> {
        if self.is_running().await? {
            return Err(DomainError::new(
                ErrorCode::ProcessError,
                "Bot process is already running",
            ));
        }

        let child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::ProcessError,
                    format!("Failed to spawn bot process: {}", e),
                )
            })?;

        info!(pid = child.id(), "bot process started");
        self.child = Some(child);
        Ok(())
    }

    async fn is_running(&mut self) -> Result<bool, DomainError> {
        let Some(child) = self.child.as_mut() else {
            return Ok(false);
        };
        match child.try_wait() {
            Ok(Some(status)) => {
                info!(%status, "bot process exited");
                self.child = None;
                Ok(false)
            }
            Ok(None) => Ok(true),
            Err(e) => Err(DomainError::new(
                ErrorCode::ProcessError,
                format!("Failed to poll bot process: {}", e),
            )),
        }
    }

    async fn stop(&mut self) -> Result<(), DomainError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        if let Some(pid) = child.id() {
            // Ask politely before resorting to SIGKILL.
            unsafe {
                libc::kill(pid as libc::pid_t, libc::SIGTERM);
            }
            match tokio::time::timeout(self.grace, child.wait()).await {
                Ok(Ok(status)) => {
                    info!(%status, "bot process stopped");
                    return Ok(());
                }
                Ok(Err(e)) => {
                    return Err(DomainError::new(
                        ErrorCode::ProcessError,
                        format!("Failed waiting for bot process: {}", e),
                    ));
                }
                Err(_) => {
                    warn!(pid, grace = ?self.grace, "bot ignored SIGTERM, killing");
                }
            }
        }

        child.kill().await.map_err(|e| {
            DomainError::new(
                ErrorCode::ProcessError,
                format!("Failed to kill bot process: {}", e),
            )
        })?;
        Ok(())
    }
}
