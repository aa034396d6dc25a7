//! Outbound command dispatch to the zellij plugin

use std::sync::{Arc, Weak};
use std::time::Duration;

use tracing::{debug, info, warn};
use utena_protocol::PluginCommand;
use utena_utils::{Result, UtenaError};

use super::transport::{DispatchError, PipeTransport};
use crate::bus::{Event, EventBus, EventKind};
use crate::context::RequestContext;

/// Serializes commands and hands them to a [`PipeTransport`]
///
/// Every send is bounded by the configured timeout and the caller's
/// deadline, whichever comes first. Nothing is retried.
#[derive(Debug)]
pub struct PluginDispatcher {
    transport: Arc<dyn PipeTransport>,
    timeout: Duration,
}

impl PluginDispatcher {
    pub fn new(transport: Arc<dyn PipeTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Forward every `SessionCreateRequested` on `bus` to the plugin
    pub fn subscribe(self: &Arc<Self>, bus: &EventBus) {
        let dispatcher: Weak<Self> = Arc::downgrade(self);
        bus.subscribe(EventKind::SessionCreateRequested, move |ctx, event| {
            let dispatcher = dispatcher.clone();
            async move {
                let (Some(dispatcher), Event::SessionCreateRequested(request)) =
                    (dispatcher.upgrade(), event)
                else {
                    return Ok(());
                };
                dispatcher
                    .create_session(&ctx, request.session_name, request.workspace_path)
                    .await
            }
        });
    }

    pub async fn send(&self, ctx: &RequestContext, command: PluginCommand) -> Result<()> {
        let missing = command.missing_fields();
        if !missing.is_empty() {
            return Err(UtenaError::invalid_argument(format!(
                "{} requires {}",
                command.command,
                missing.join(", ")
            )));
        }

        let payload = serde_json::to_string(&command)
            .map_err(|e| DispatchError::Encode(e.to_string()))?;

        debug!(command = %command.command, "Dispatching plugin command");

        let deadline = ctx.deadline_within(self.timeout);
        let outcome = tokio::select! {
            _ = ctx.cancelled() => Err(DispatchError::Cancelled),
            sent = tokio::time::timeout_at(deadline, self.transport.send(&payload)) => {
                sent.unwrap_or(Err(DispatchError::Timeout))
            }
        };

        match outcome {
            Ok(()) => {
                info!(command = %command.command, "Plugin command delivered");
                Ok(())
            }
            Err(e) => {
                warn!(command = %command.command, error = %e, "Plugin command failed");
                Err(e.into())
            }
        }
    }

    pub async fn open_picker(&self, ctx: &RequestContext) -> Result<()> {
        self.send(ctx, PluginCommand::open_picker()).await
    }

    pub async fn close_picker(&self, ctx: &RequestContext) -> Result<()> {
        self.send(ctx, PluginCommand::close_picker()).await
    }

    pub async fn switch_session(&self, ctx: &RequestContext, session_name: impl Into<String>) -> Result<()> {
        self.send(ctx, PluginCommand::switch_session(session_name)).await
    }

    pub async fn create_session(
        &self,
        ctx: &RequestContext,
        session_name: impl Into<String>,
        workspace_path: impl Into<String>,
    ) -> Result<()> {
        self.send(ctx, PluginCommand::create_session(session_name, workspace_path))
            .await
    }
}
