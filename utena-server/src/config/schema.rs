//! Configuration schema structs

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use utena_protocol::{Workspace, COMMAND_PIPE_NAME, DEFAULT_LISTEN_ADDR};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub plugin: PluginConfig,
    pub sessions: SessionsConfig,
    pub workspaces: WorkspacesConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP API binds to
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.into(),
        }
    }
}

/// How commands reach the zellij plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// zellij executable used for `zellij pipe`
    pub binary: String,
    /// Pipe name the plugin listens on
    pub pipe_name: String,
    /// Upper bound for a single dispatch
    pub timeout_ms: u64,
}

impl PluginConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            binary: "zellij".into(),
            pipe_name: COMMAND_PIPE_NAME.into(),
            timeout_ms: 5000,
        }
    }
}

/// Workspace assignment for sessions discovered through snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Workspace id given to sessions nothing else claims
    pub default_workspace: String,
    /// Register `default_workspace` (rooted at `$HOME`) if it is missing
    pub create_default_workspace: bool,
    /// Prefer a workspace whose name equals the session name
    pub match_workspace_by_name: bool,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            default_workspace: "default".into(),
            create_default_workspace: true,
            match_workspace_by_name: false,
        }
    }
}

/// Workspace sources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspacesConfig {
    /// Directories whose sub-directories each become a workspace
    pub root_dirs: Vec<PathBuf>,
    /// Directories that each become a workspace
    pub extra_dirs: Vec<PathBuf>,
    /// Workspaces registered verbatim
    pub seed: Vec<WorkspaceSeed>,
}

/// A workspace declared in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSeed {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub is_git_repo: bool,
}

impl From<WorkspaceSeed> for Workspace {
    fn from(seed: WorkspaceSeed) -> Self {
        Workspace::new(seed.id, seed.name, seed.path).git_repo(seed.is_git_repo)
    }
}
