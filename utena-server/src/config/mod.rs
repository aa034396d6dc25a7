//! Configuration management for the utena daemon
//!
//! Loaded once at start-up from `config.toml`; there is no hot reload.

mod defaults;
mod loader;
mod schema;

pub use defaults::DEFAULT_CONFIG_TOML;
pub use loader::ConfigLoader;
pub use schema::*;
