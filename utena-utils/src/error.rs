//! Error types for utena
//!
//! Provides a unified error type used across all utena crates.

use std::path::PathBuf;

/// Coarse classification of an error, used at the HTTP boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Lookup by id or path failed
    NotFound,
    /// Duplicate id on insert
    AlreadyExists,
    /// Empty required field or malformed input
    InvalidArgument,
    /// Command could not be delivered to the plugin
    DispatchFailed,
    /// Anything else
    Unknown,
}

/// Main error type for utena operations
#[derive(Debug, thiserror::Error)]
pub enum UtenaError {
    // === IO Errors ===

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Configuration Errors ===

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    // === Registry Errors ===

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    #[error("Session already exists: {0}")]
    SessionExists(String),

    #[error("Workspace already exists: {0}")]
    WorkspaceExists(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // === Plugin Errors ===

    #[error("Plugin dispatch failed: {0}")]
    DispatchFailed(String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    // === Internal Errors ===

    #[error("Internal error: {0}")]
    Internal(String),
}

impl UtenaError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a dispatch error
    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::DispatchFailed(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SessionNotFound(_) | Self::WorkspaceNotFound(_) => ErrorKind::NotFound,
            Self::SessionExists(_) | Self::WorkspaceExists(_) => ErrorKind::AlreadyExists,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::DispatchFailed(_) => ErrorKind::DispatchFailed,
            _ => ErrorKind::Unknown,
        }
    }

    /// Check if this error is worth retrying
    ///
    /// Nothing in utena retries on its own; this only informs callers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DispatchFailed(_))
    }
}

/// Result type alias using UtenaError
pub type Result<T> = std::result::Result<T, UtenaError>;
