//! Daemon wiring: registries, bus, subscribers and shutdown

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};
use utena_protocol::Workspace;
use utena_utils::{home_dir, Result, UtenaError};

use crate::bus::EventBus;
use crate::config::AppConfig;
use crate::context::RequestContext;
use crate::plugin::{PipeTransport, PluginDispatcher};
use crate::reconcile::Reconciler;
use crate::session::{SessionRegistry, SessionService};
use crate::workspace::{discovery, WorkspaceRegistry};

/// Shared state handed to every request handler
#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub workspaces: Arc<WorkspaceRegistry>,
    pub sessions: SessionService,
    pub bus: Arc<EventBus>,
    pub dispatcher: Arc<PluginDispatcher>,
    pub reconciler: Arc<Reconciler>,
    /// Broadcast channel for shutdown coordination
    pub shutdown_tx: broadcast::Sender<()>,
    root: RequestContext,
}

impl AppState {
    /// Build the daemon's components and register event subscribers
    pub fn new(config: AppConfig, transport: Arc<dyn PipeTransport>) -> Result<Arc<Self>> {
        let workspaces = Arc::new(WorkspaceRegistry::new());
        seed_workspaces(&workspaces, &config)?;

        let bus = Arc::new(EventBus::new());
        let sessions = SessionService::new(
            Arc::new(SessionRegistry::new()),
            Arc::clone(&workspaces),
            Arc::clone(&bus),
        );

        let dispatcher = Arc::new(PluginDispatcher::new(transport, config.plugin.timeout()));
        dispatcher.subscribe(&bus);

        let reconciler = Arc::new(Reconciler::new(sessions.clone(), config.sessions.clone()));
        reconciler.subscribe(&bus);

        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Arc::new(Self {
            config,
            workspaces,
            sessions,
            bus,
            dispatcher,
            reconciler,
            shutdown_tx,
            root: RequestContext::new(),
        }))
    }

    /// Fresh context for one request, cancelled on shutdown
    pub fn request_context(&self) -> RequestContext {
        self.root.child()
    }

    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Stop accepting requests and cancel in-flight ones
    pub fn shutdown(&self) {
        info!("Shutting down");
        // No receivers just means nothing is listening yet
        let _ = self.shutdown_tx.send(());
        self.root.cancel();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.root.is_cancelled()
    }
}

/// Register configured, discovered and default workspaces, in that order
fn seed_workspaces(registry: &WorkspaceRegistry, config: &AppConfig) -> Result<()> {
    for seed in &config.workspaces.seed {
        registry.add(Workspace::from(seed.clone())).map_err(|e| {
            UtenaError::config(format!("invalid workspace seed '{}': {}", seed.id, e))
        })?;
    }

    let discovered = discovery::discover(
        registry,
        &config.workspaces.root_dirs,
        &config.workspaces.extra_dirs,
    );

    let default_id = &config.sessions.default_workspace;
    if config.sessions.create_default_workspace && !registry.contains(default_id) {
        let home = home_dir();
        let path = home.to_string_lossy().into_owned();
        registry.add(Workspace::new(default_id.clone(), default_id.clone(), path))?;
    } else if !registry.contains(default_id) {
        warn!(
            workspace_id = %default_id,
            "Default workspace is not registered; snapshots with new sessions will fail"
        );
    }

    info!(
        seeded = config.workspaces.seed.len(),
        discovered,
        total = registry.len(),
        "Workspaces registered"
    );
    Ok(())
}
