//! Concurrent in-memory workspace store

use std::collections::HashMap;

use parking_lot::RwLock;
use utena_protocol::Workspace;
use utena_utils::{Result, UtenaError};

/// Keyed workspace store; workspaces never change once added
#[derive(Debug, Default)]
pub struct WorkspaceRegistry {
    workspaces: RwLock<HashMap<String, Workspace>>,
}

impl WorkspaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, workspace: Workspace) -> Result<()> {
        if workspace.id.is_empty() {
            return Err(UtenaError::invalid_argument("workspace id must not be empty"));
        }

        let mut workspaces = self.workspaces.write();
        if workspaces.contains_key(&workspace.id) {
            return Err(UtenaError::WorkspaceExists(workspace.id));
        }
        workspaces.insert(workspace.id.clone(), workspace);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Workspace> {
        self.workspaces
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| UtenaError::WorkspaceNotFound(id.to_string()))
    }

    pub fn get_by_path(&self, path: &str) -> Result<Workspace> {
        self.workspaces
            .read()
            .values()
            .find(|w| w.path == path)
            .cloned()
            .ok_or_else(|| UtenaError::WorkspaceNotFound(path.to_string()))
    }

    /// First workspace with the given display name, lowest id first
    pub fn find_by_name(&self, name: &str) -> Option<Workspace> {
        self.workspaces
            .read()
            .values()
            .filter(|w| w.name == name)
            .min_by(|a, b| a.id.cmp(&b.id))
            .cloned()
    }

    /// All workspaces sorted by id
    pub fn list(&self) -> Vec<Workspace> {
        let mut workspaces: Vec<Workspace> = self.workspaces.read().values().cloned().collect();
        workspaces.sort_by(|a, b| a.id.cmp(&b.id));
        workspaces
    }

    pub fn contains(&self, id: &str) -> bool {
        self.workspaces.read().contains_key(id)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.workspaces.read().values().any(|w| w.path == path)
    }

    pub fn len(&self) -> usize {
        self.workspaces.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.read().is_empty()
    }
}
