//! Default configuration values
//!
//! Mirrors the `Default` impls in `schema.rs`; a test keeps the two in sync.

/// Default configuration as TOML
pub const DEFAULT_CONFIG_TOML: &str = r##"
# utena configuration

[server]
listen_addr = "127.0.0.1:3333"

[plugin]
binary = "zellij"
pipe_name = "utena-commands"
timeout_ms = 5000

[sessions]
default_workspace = "default"
create_default_workspace = true
match_workspace_by_name = false

[workspaces]
# Every sub-directory of these becomes a workspace
root_dirs = []
# Each of these directories becomes a workspace
extra_dirs = []

# [[workspaces.seed]]
# id = "ws-1"
# name = "utena"
# path = "/home/me/dev/utena"
# is_git_repo = true
"##;
