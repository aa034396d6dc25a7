//! utena-utils: Common utilities shared across utena crates
//!
//! This crate provides:
//! - Unified error types ([`UtenaError`], [`Result`])
//! - Logging infrastructure ([`init_logging_with_config`], [`LogConfig`])
//! - XDG-compliant path utilities ([`paths`] module)

pub mod error;
pub mod logging;
pub mod paths;

// Re-export main types at crate root for convenience
pub use error::{ErrorKind, Result, UtenaError};
pub use logging::{init_logging_with_config, LogConfig, LogOutput};

pub use paths::{config_dir, config_file, expand_home, home_dir, log_dir, state_dir};
