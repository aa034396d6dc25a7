//! Configuration loader

use std::net::SocketAddr;
use std::path::Path;

use utena_utils::{config_file, Result, UtenaError};

use super::AppConfig;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from default location
    pub fn load() -> Result<AppConfig> {
        let path = config_file();
        if path.exists() {
            Self::load_from_path(&path)
        } else {
            Ok(AppConfig::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<AppConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| UtenaError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content, path)
    }

    /// Parse configuration from string
    pub fn parse(content: &str, path: &Path) -> Result<AppConfig> {
        toml::from_str(content).map_err(|e| UtenaError::ConfigInvalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Validate configuration
    pub fn validate(config: &AppConfig) -> Result<()> {
        if config.server.listen_addr.parse::<SocketAddr>().is_err() {
            return Err(UtenaError::config(format!(
                "listen_addr '{}' is not a socket address",
                config.server.listen_addr
            )));
        }

        if config.plugin.binary.is_empty() {
            return Err(UtenaError::config("plugin binary must not be empty"));
        }
        if config.plugin.pipe_name.is_empty() {
            return Err(UtenaError::config("plugin pipe_name must not be empty"));
        }
        if config.plugin.timeout_ms == 0 {
            return Err(UtenaError::config("plugin timeout_ms must be greater than 0"));
        }

        if config.sessions.default_workspace.is_empty() {
            return Err(UtenaError::config("default_workspace must not be empty"));
        }

        for seed in &config.workspaces.seed {
            if seed.id.is_empty() {
                return Err(UtenaError::config("workspace seed with an empty id"));
            }
        }

        Ok(())
    }

    /// Load from an explicit path, or the default location, and validate
    pub fn load_and_validate(path: Option<&Path>) -> Result<AppConfig> {
        let config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load()?,
        };
        Self::validate(&config)?;
        Ok(config)
    }
}
