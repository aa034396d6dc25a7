//! Plugin commands and HTTP message bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Session, Workspace};

// ==================== Plugin Commands ====================

/// Command vocabulary understood by the zellij plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    OpenPicker,
    ClosePicker,
    SwitchSession,
    CreateSession,
}

impl CommandKind {
    /// Wire name of the command
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenPicker => "open_picker",
            Self::ClosePicker => "close_picker",
            Self::SwitchSession => "switch_session",
            Self::CreateSession => "create_session",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload written to the plugin's command pipe
///
/// Optional fields are omitted from the JSON when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginCommand {
    pub command: CommandKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_path: Option<String>,
}

impl PluginCommand {
    pub fn open_picker() -> Self {
        Self {
            command: CommandKind::OpenPicker,
            session_name: None,
            workspace_path: None,
        }
    }

    pub fn close_picker() -> Self {
        Self {
            command: CommandKind::ClosePicker,
            session_name: None,
            workspace_path: None,
        }
    }

    pub fn switch_session(session_name: impl Into<String>) -> Self {
        Self {
            command: CommandKind::SwitchSession,
            session_name: Some(session_name.into()),
            workspace_path: None,
        }
    }

    pub fn create_session(
        session_name: impl Into<String>,
        workspace_path: impl Into<String>,
    ) -> Self {
        Self {
            command: CommandKind::CreateSession,
            session_name: Some(session_name.into()),
            workspace_path: Some(workspace_path.into()),
        }
    }

    /// Names of required fields that are missing or empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());

        let mut missing = Vec::new();
        match self.command {
            CommandKind::OpenPicker | CommandKind::ClosePicker => {}
            CommandKind::SwitchSession => {
                if !present(&self.session_name) {
                    missing.push("session_name");
                }
            }
            CommandKind::CreateSession => {
                if !present(&self.session_name) {
                    missing.push("session_name");
                }
                if !present(&self.workspace_path) {
                    missing.push("workspace_path");
                }
            }
        }
        missing
    }
}

// ==================== HTTP Bodies ====================

/// Body of `POST /sessions` and `PUT /sessions/{id}`
///
/// `last_used_at` defaults to the time the request is handled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub workspace_id: String,
    #[serde(default)]
    pub is_attached: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_dead: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

impl SessionRequest {
    /// Convert into a session, stamping `now` when no timestamp was sent
    pub fn into_session(self, now: DateTime<Utc>) -> Session {
        Session {
            id: self.id,
            workspace_id: self.workspace_id,
            is_attached: self.is_attached,
            is_active: self.is_active,
            is_dead: self.is_dead,
            last_used_at: self.last_used_at.unwrap_or(now),
        }
    }
}

impl From<Session> for SessionRequest {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            workspace_id: session.workspace_id,
            is_attached: session.is_attached,
            is_active: session.is_active,
            is_dead: session.is_dead,
            last_used_at: Some(session.last_used_at),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceListResponse {
    pub workspaces: Vec<Workspace>,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP reason phrase
    pub status: String,
    /// Human readable cause
    pub error: String,
}

/// Acknowledgement body for fire-and-forget endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: String,
}

impl Default for OkResponse {
    fn default() -> Self {
        Self { ok: "ok".into() }
    }
}
