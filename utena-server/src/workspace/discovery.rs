//! Workspace discovery from project directories
//!
//! Every sub-directory of a root directory becomes a workspace, as does each
//! explicitly listed extra directory. A workspace's id and name are its
//! directory name.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use utena_protocol::Workspace;
use utena_utils::expand_home;

use super::WorkspaceRegistry;

/// Whether `dir` is the root of a git checkout (`.git` may be a file for worktrees)
pub fn is_git_repo(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Build a workspace for one directory
pub fn workspace_for_dir(dir: &Path) -> Option<Workspace> {
    let name = dir.file_name()?.to_str()?.to_string();
    let path = dir.to_str()?.to_string();
    Some(Workspace::new(name.clone(), name, path).git_repo(is_git_repo(dir)))
}

/// Directories directly below `root`, sorted by name
///
/// Unreadable or missing roots yield nothing and are logged.
pub fn scan_root(root: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(root = %root.display(), error = %e, "Skipping unreadable workspace root");
            return Vec::new();
        }
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}

/// Register discovered workspaces, skipping id or path collisions
///
/// Returns how many workspaces were added.
pub fn discover(registry: &WorkspaceRegistry, root_dirs: &[PathBuf], extra_dirs: &[PathBuf]) -> usize {
    let mut candidates: Vec<PathBuf> = root_dirs
        .iter()
        .flat_map(|root| scan_root(&expand_home(root)))
        .collect();

    for dir in extra_dirs {
        let dir = expand_home(dir);
        if dir.is_dir() {
            candidates.push(dir);
        } else {
            warn!(dir = %dir.display(), "Skipping missing workspace directory");
        }
    }

    let mut added = 0;
    for dir in candidates {
        let Some(workspace) = workspace_for_dir(&dir) else {
            warn!(dir = %dir.display(), "Skipping workspace with a non UTF-8 path");
            continue;
        };

        if registry.contains_path(&workspace.path) {
            debug!(path = %workspace.path, "Workspace path already registered");
            continue;
        }

        let id = workspace.id.clone();
        match registry.add(workspace) {
            Ok(()) => added += 1,
            Err(e) => debug!(workspace_id = %id, error = %e, "Skipping discovered workspace"),
        }
    }

    added
}
