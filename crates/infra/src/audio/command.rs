//! Timeout-bounded execution of external audio-control commands

use async_trait::async_trait;
use micswitch_core::domain::audio::{AudioError, Result};
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Runs a program to completion and returns its standard output
///
/// Success means exit status 0. A non-zero exit or spawn failure is
/// [`AudioError::CommandFailed`], a missing program is
/// [`AudioError::Unavailable`] and an overrun is [`AudioError::Timeout`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<String>;
}

/// Spawns real child processes with tokio
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<String> {
        let command_line = render_command(program, args);
        debug!(command = %command_line, ?timeout, "Running command");

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => AudioError::Unavailable(format!("{program} not found")),
                _ => AudioError::CommandFailed {
                    command: command_line.clone(),
                    message: e.to_string(),
                },
            })?;

        // Dropping the pending future on timeout drops the child, which kills it
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| AudioError::CommandFailed {
                command: command_line.clone(),
                message: e.to_string(),
            })?,
            Err(_) => {
                return Err(AudioError::Timeout {
                    command: command_line,
                    timeout,
                })
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => output.status.to_string(),
                stderr => stderr.to_string(),
            };
            return Err(AudioError::CommandFailed {
                command: command_line,
                message,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Human-readable command line for logs and error messages
pub fn render_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
