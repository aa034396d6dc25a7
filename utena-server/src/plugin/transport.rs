//! Delivery of serialized commands to the zellij plugin

use std::process::Stdio;

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::process::Command;
use tracing::trace;
use utena_utils::UtenaError;

/// Error type for command delivery
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Failed to spawn {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pipe exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("Dispatch timed out")]
    Timeout,

    #[error("Dispatch cancelled")]
    Cancelled,

    #[error("Failed to encode command: {0}")]
    Encode(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<DispatchError> for UtenaError {
    fn from(err: DispatchError) -> Self {
        UtenaError::DispatchFailed(err.to_string())
    }
}

/// Something that can carry one JSON payload to the plugin
///
/// Implementations must be cancel-safe: dropping the returned future abandons
/// the delivery.
pub trait PipeTransport: Send + Sync + std::fmt::Debug {
    fn send<'a>(&'a self, payload: &'a str) -> BoxFuture<'a, Result<(), DispatchError>>;
}

/// Runs `zellij pipe --name <pipe> --payload <json>`
#[derive(Debug, Clone)]
pub struct ZellijPipe {
    binary: String,
    pipe_name: String,
}

impl ZellijPipe {
    pub fn new(binary: impl Into<String>, pipe_name: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            pipe_name: pipe_name.into(),
        }
    }

    async fn run(&self, payload: &str) -> Result<(), DispatchError> {
        trace!(binary = %self.binary, pipe = %self.pipe_name, "Spawning zellij pipe");

        let output = Command::new(&self.binary)
            .arg("pipe")
            .arg("--name")
            .arg(&self.pipe_name)
            .arg("--payload")
            .arg(payload)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| DispatchError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DispatchError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

impl PipeTransport for ZellijPipe {
    fn send<'a>(&'a self, payload: &'a str) -> BoxFuture<'a, Result<(), DispatchError>> {
        Box::pin(self.run(payload))
    }
}
