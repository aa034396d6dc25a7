//! Workspace registry and discovery

pub mod discovery;
mod registry;

pub use registry::WorkspaceRegistry;
