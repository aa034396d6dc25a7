//! utena-protocol: Shared wire definitions
//!
//! Data types exchanged between the utena daemon, its HTTP clients and the
//! zellij plugin: sessions, workspaces, plugin snapshots and pipe commands.

pub mod messages;
pub mod types;

// Re-export main types at crate root
pub use messages::{
    CommandKind, ErrorResponse, OkResponse, PluginCommand, SessionListResponse, SessionRequest,
    WorkspaceListResponse,
};
pub use types::{Session, SessionUpdate, SessionsSnapshot, Workspace};

/// Name of the zellij pipe the plugin listens on
pub const COMMAND_PIPE_NAME: &str = "utena-commands";

/// Default daemon HTTP address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3333";
