//! Shell command execution that reports back through the event channel.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::AppError;
use crate::event::Event;

/// Result of one submitted command.
#[derive(Debug)]
pub struct CommandResult {
    /// Correlation token of the submission.
    pub id: u64,
    /// The command as it was run.
    pub input: String,
    /// Captured stdout with trailing newlines trimmed.
    pub output: String,
    pub error: Option<AppError>,
}

/// Runs commands through the host shell without blocking the caller.
pub struct CommandRunner {
    shell: String,
    tx: mpsc::UnboundedSender<Event>,
    next_id: AtomicU64,
}

impl CommandRunner {
    pub fn new(shell: impl Into<String>, tx: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            shell: shell.into(),
            tx,
            next_id: AtomicU64::new(1),
        }
    }

    /// Start `input` in the background and return its correlation id.
    ///
    /// Whitespace-only input spawns nothing and posts an empty result immediately.
    pub fn run(&self, input: &str) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let input = input.trim().to_string();

        if input.is_empty() {
            let _ = self.tx.send(Event::CommandComplete(CommandResult {
                id,
                input,
                output: String::new(),
                error: None,
            }));
            return id;
        }

        info!(id, command = %input, "running command");
        let shell = self.shell.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = execute(&shell, id, input).await;
            if let Some(err) = &result.error {
                warn!(id, error = %err, "command failed");
            } else {
                info!(id, "command finished");
            }
            let _ = tx.send(Event::CommandComplete(result));
        });
        id
    }
}

async fn execute(shell: &str, id: u64, input: String) -> CommandResult {
    let (output, error) = match Command::new(shell).arg("-c").arg(&input).output().await {
        Ok(out) if out.status.success() => (trim_output(&out.stdout), None),
        Ok(out) => {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            let msg = if stderr.is_empty() {
                out.status.to_string()
            } else {
                stderr
            };
            (String::new(), Some(AppError::CommandFailure(msg)))
        }
        Err(e) => (String::new(), Some(AppError::CommandFailure(e.to_string()))),
    };
    CommandResult {
        id,
        input,
        output,
        error,
    }
}

fn trim_output(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout)
        .trim_end_matches(['\n', '\r'])
        .to_string()
}
