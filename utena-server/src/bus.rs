//! In-process event bus
//!
//! Handlers are registered per [`EventKind`] and run sequentially, in
//! registration order, inside the publisher's task. The first handler error
//! stops the dispatch and is returned to the publisher.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::RwLock;
use tracing::debug;
use utena_protocol::{SessionUpdate, SessionsSnapshot};
use utena_utils::{Result, UtenaError};

use crate::context::RequestContext;

/// Payload of [`Event::SessionCreateRequested`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCreateRequested {
    pub session_name: String,
    pub workspace_path: String,
}

/// Events exchanged between daemon subsystems
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The plugin reported the full list of sessions it knows about
    SessionsSnapshotReported(SessionsSnapshot),
    /// The daemon created a session the plugin should open
    SessionCreateRequested(SessionCreateRequested),
}

/// Stable tag identifying an event's type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SessionsSnapshotReported,
    SessionCreateRequested,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionsSnapshotReported => "sessions_snapshot_reported",
            Self::SessionCreateRequested => "session_create_requested",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Event {
    pub fn sessions_snapshot(sessions: Vec<SessionUpdate>) -> Self {
        Self::SessionsSnapshotReported(SessionsSnapshot::new(sessions))
    }

    pub fn session_create_requested(
        session_name: impl Into<String>,
        workspace_path: impl Into<String>,
    ) -> Self {
        Self::SessionCreateRequested(SessionCreateRequested {
            session_name: session_name.into(),
            workspace_path: workspace_path.into(),
        })
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::SessionsSnapshotReported(_) => EventKind::SessionsSnapshotReported,
            Self::SessionCreateRequested(_) => EventKind::SessionCreateRequested,
        }
    }

    /// Reject payloads no handler could act on
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::SessionsSnapshotReported(snapshot) => {
                if snapshot.sessions.iter().any(|s| s.name.is_empty()) {
                    return Err(UtenaError::invalid_argument(
                        "snapshot contains a session with an empty name",
                    ));
                }
            }
            Self::SessionCreateRequested(request) => {
                if request.session_name.is_empty() {
                    return Err(UtenaError::invalid_argument(
                        "session create request has an empty session name",
                    ));
                }
            }
        }
        Ok(())
    }
}

type Handler = Arc<dyn Fn(RequestContext, Event) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Publish/subscribe hub shared by the daemon's subsystems
#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<HashMap<EventKind, Vec<Handler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.read();
        let counts: HashMap<&'static str, usize> =
            handlers.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind
    pub fn subscribe<F, Fut>(&self, kind: EventKind, handler: F)
    where
        F: Fn(RequestContext, Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let boxed: Handler = Arc::new(
            move |ctx: RequestContext, event: Event| -> BoxFuture<'static, Result<()>> {
                Box::pin(handler(ctx, event))
            },
        );
        self.handlers.write().entry(kind).or_default().push(boxed);
        debug!(event = %kind, "Handler subscribed");
    }

    /// Deliver an event to every handler registered for its kind
    ///
    /// The handler table lock is released before any handler runs, so
    /// handlers may publish or subscribe themselves.
    pub async fn publish(&self, ctx: &RequestContext, event: Event) -> Result<()> {
        event.validate()?;

        let kind = event.kind();
        let handlers: Vec<Handler> = self
            .handlers
            .read()
            .get(&kind)
            .cloned()
            .unwrap_or_default();

        debug!(event = %kind, handlers = handlers.len(), "Publishing event");

        for handler in handlers {
            if let Err(e) = handler(ctx.clone(), event.clone()).await {
                debug!(event = %kind, error = %e, "Event handler failed");
                return Err(e);
            }
        }

        Ok(())
    }

    /// Number of handlers registered for a kind
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.read().get(&kind).map_or(0, Vec::len)
    }
}
