//! Session operations with workspace validation and event publication

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use utena_protocol::Session;
use utena_utils::Result;

use super::registry::check_keys;
use super::SessionRegistry;
use crate::bus::{Event, EventBus};
use crate::context::RequestContext;
use crate::workspace::WorkspaceRegistry;

/// Entry point for every session mutation, from HTTP or reconciliation
///
/// Mutations reject empty keys, then check that the referenced workspace
/// exists before touching the registry. No operation spans more than one registry call, so concurrent
/// callers interleave per session, not per request.
#[derive(Debug, Clone)]
pub struct SessionService {
    sessions: Arc<SessionRegistry>,
    workspaces: Arc<WorkspaceRegistry>,
    bus: Arc<EventBus>,
}

impl SessionService {
    pub fn new(
        sessions: Arc<SessionRegistry>,
        workspaces: Arc<WorkspaceRegistry>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            sessions,
            workspaces,
            bus,
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    pub fn workspaces(&self) -> &Arc<WorkspaceRegistry> {
        &self.workspaces
    }

    pub fn list_sessions(&self) -> Vec<Session> {
        self.sessions.list()
    }

    pub fn list_sessions_by_workspace(&self, workspace_id: &str) -> Result<Vec<Session>> {
        self.workspaces.get(workspace_id)?;
        Ok(self.sessions.list_by_workspace(workspace_id))
    }

    pub fn get_session(&self, id: &str) -> Result<Session> {
        self.sessions.get(id)
    }

    pub fn create_session(&self, ctx: &RequestContext, session: Session) -> Result<Session> {
        ctx.ensure_active()?;
        check_keys(&session)?;
        self.workspaces.get(&session.workspace_id)?;

        self.sessions.add(session.clone())?;
        debug!(session_id = %session.id, workspace_id = %session.workspace_id, "Session created");
        Ok(session)
    }

    /// Create a session, then ask the plugin to open it
    ///
    /// The session stays registered when the notification fails; the error
    /// is still returned so the caller can report it.
    pub async fn create_session_and_notify(
        &self,
        ctx: &RequestContext,
        session: Session,
    ) -> Result<Session> {
        check_keys(&session)?;
        let workspace = self.workspaces.get(&session.workspace_id)?;
        let session = self.create_session(ctx, session)?;

        let event = Event::session_create_requested(session.id.clone(), workspace.path);
        if let Err(e) = self.bus.publish(ctx, event).await {
            warn!(session_id = %session.id, error = %e, "Session created but plugin notification failed");
            return Err(e);
        }

        info!(session_id = %session.id, "Session created and plugin notified");
        Ok(session)
    }

    pub fn update_session(&self, ctx: &RequestContext, session: Session) -> Result<Session> {
        ctx.ensure_active()?;
        check_keys(&session)?;
        self.workspaces.get(&session.workspace_id)?;

        self.sessions.update(session)
    }

    pub fn delete_session(&self, ctx: &RequestContext, id: &str) -> Result<Session> {
        ctx.ensure_active()?;

        let removed = self.sessions.delete(id)?;
        debug!(session_id = %id, "Session deleted");
        Ok(removed)
    }

    /// Mark a session as used now
    pub fn touch_session(&self, ctx: &RequestContext, id: &str) -> Result<Session> {
        ctx.ensure_active()?;
        self.sessions.touch(id, Utc::now())
    }
}
