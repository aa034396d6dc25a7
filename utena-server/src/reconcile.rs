//! Reconciliation of the session registry against plugin snapshots
//!
//! A snapshot is the complete list of sessions zellij knows about. Sessions
//! named in it are refreshed (or created), known sessions missing from it are
//! marked dead. Records are never removed here.

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use chrono::Utc;
use tracing::{debug, info};
use utena_protocol::{Session, SessionUpdate};
use utena_utils::{Result, UtenaError};

use crate::bus::{Event, EventBus, EventKind};
use crate::config::SessionsConfig;
use crate::context::RequestContext;
use crate::session::SessionService;

/// What one reconciliation cycle changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub refreshed: usize,
    pub marked_dead: usize,
    pub created: usize,
}

/// Applies plugin snapshots to the session registry
#[derive(Debug)]
pub struct Reconciler {
    service: SessionService,
    policy: SessionsConfig,
}

impl Reconciler {
    pub fn new(service: SessionService, policy: SessionsConfig) -> Self {
        Self { service, policy }
    }

    /// Handle every `SessionsSnapshotReported` published on `bus`
    pub fn subscribe(self: &Arc<Self>, bus: &EventBus) {
        let reconciler: Weak<Self> = Arc::downgrade(self);
        bus.subscribe(EventKind::SessionsSnapshotReported, move |ctx, event| {
            let reconciler = reconciler.clone();
            async move {
                let (Some(reconciler), Event::SessionsSnapshotReported(snapshot)) =
                    (reconciler.upgrade(), event)
                else {
                    return Ok(());
                };
                reconciler.reconcile(&ctx, &snapshot.sessions).map(|_| ())
            }
        });
    }

    /// Run one reconciliation cycle
    ///
    /// The first failing registry write aborts the cycle; writes made before
    /// it are kept.
    pub fn reconcile(&self, ctx: &RequestContext, updates: &[SessionUpdate]) -> Result<ReconcileReport> {
        ctx.ensure_active()?;

        let now = Utc::now();
        let mut report = ReconcileReport::default();

        // Later duplicates overwrite earlier ones; BTreeMap keeps creation order stable
        let mut active_by_name: BTreeMap<&str, &SessionUpdate> = BTreeMap::new();
        for update in updates {
            active_by_name.insert(update.name.as_str(), update);
        }

        for mut session in self.service.list_sessions() {
            match active_by_name.remove(session.id.as_str()) {
                Some(update) => {
                    session.is_attached = update.is_current_session;
                    session.is_active = true;
                    session.is_dead = false;
                    session.last_used_at = now;
                    report.refreshed += 1;
                }
                None => {
                    if !session.is_dead {
                        report.marked_dead += 1;
                    }
                    session.is_dead = true;
                }
            }
            self.service.update_session(ctx, session)?;
        }

        for (name, update) in active_by_name {
            let workspace_id = self.assign_workspace(name)?;
            let session = Session {
                id: name.to_string(),
                workspace_id,
                is_attached: update.is_current_session,
                is_active: true,
                is_dead: false,
                last_used_at: now,
            };
            self.service.create_session(ctx, session)?;
            debug!(session_id = %name, "Session discovered from snapshot");
            report.created += 1;
        }

        info!(
            refreshed = report.refreshed,
            marked_dead = report.marked_dead,
            created = report.created,
            "Reconciled session snapshot"
        );
        Ok(report)
    }

    /// Pick the workspace for a session first seen in a snapshot
    fn assign_workspace(&self, session_name: &str) -> Result<String> {
        let workspaces = self.service.workspaces();

        if self.policy.match_workspace_by_name {
            if let Some(workspace) = workspaces.find_by_name(session_name) {
                return Ok(workspace.id);
            }
        }

        let fallback = &self.policy.default_workspace;
        if !workspaces.contains(fallback) {
            return Err(UtenaError::WorkspaceNotFound(fallback.clone()));
        }
        Ok(fallback.clone())
    }
}
