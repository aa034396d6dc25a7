//! utena-server: zellij session daemon
//!
//! Keeps a registry of zellij sessions in sync with snapshots reported by the
//! utena plugin and sends commands back to it through `zellij pipe`.
//!
//! - [`bus`]: in-process publish/subscribe between subsystems
//! - [`session`], [`workspace`]: concurrent registries
//! - [`reconcile`]: applies plugin snapshots to the session registry
//! - [`plugin`]: outbound command dispatch
//! - [`http`]: the HTTP API

pub mod app;
pub mod bus;
pub mod config;
pub mod context;
pub mod http;
pub mod plugin;
pub mod reconcile;
pub mod session;
pub mod workspace;

pub use app::AppState;
pub use context::RequestContext;
