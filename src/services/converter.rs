//! External converter invocation
//!
//! Executes the configured conversion command as
//! `<command> [args...] <input> <output>` and captures its output. The
//! conversion contract: exit zero and produce the output file on
//! success; nonzero exit signals failure; stdout and stderr are relayed
//! verbatim to the caller.
//!
//! The child runs under a configurable deadline and is spawned with
//! kill-on-drop, so a request future dropped by a client disconnect
//! reaps the process instead of leaking it.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::ConverterSettings;

/// Conversion failure reasons
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Command could not be spawned (missing binary, permissions)
    #[error("failed to spawn converter `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Command ran but exited nonzero
    #[error("converter exited with {status}")]
    Failed {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },

    /// Command exited zero without producing the output file
    #[error("converter produced no output file at {0}")]
    MissingOutput(PathBuf),

    /// Command exceeded the configured deadline and was killed
    #[error("converter timed out after {0:?}")]
    TimedOut(Duration),

    /// Reading the child's output failed
    #[error("failed to collect converter output: {0}")]
    Io(#[from] std::io::Error),
}

/// Captured output of a successful conversion
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Invokes the external conversion command
#[derive(Debug, Clone)]
pub struct Converter {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Converter {
    pub fn new(settings: &ConverterSettings) -> Self {
        Self {
            command: settings.command.clone(),
            args: settings.args.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run one conversion. Blocks the calling request (not the runtime)
    /// until the child exits, the deadline passes, or the request is
    /// dropped.
    pub async fn convert(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<ConversionOutput, ConvertError> {
        debug!(
            command = %self.command,
            input = %input.display(),
            output = %output.display(),
            "Invoking converter"
        );

        let child = Command::new(&self.command)
            .args(&self.args)
            .arg(input)
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ConvertError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        // Dropping the wait future (deadline or client disconnect) kills
        // the child via kill_on_drop.
        let result = tokio::time::timeout(self.timeout, child.wait_with_output()).await;
        let out = match result {
            Ok(out) => out?,
            Err(_) => {
                warn!(
                    command = %self.command,
                    timeout_secs = self.timeout.as_secs(),
                    "Converter deadline exceeded, child killed"
                );
                return Err(ConvertError::TimedOut(self.timeout));
            }
        };

        let stdout = String::from_utf8_lossy(&out.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&out.stderr).into_owned();

        if !out.status.success() {
            return Err(ConvertError::Failed {
                status: out.status,
                stdout,
                stderr,
            });
        }

        // Exit zero is not enough: the contract requires the artifact.
        if tokio::fs::metadata(output).await.is_err() {
            return Err(ConvertError::MissingOutput(output.to_path_buf()));
        }

        debug!(output = %output.display(), "Conversion complete");

        Ok(ConversionOutput { stdout, stderr })
    }
}
