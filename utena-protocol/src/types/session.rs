use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A zellij session as tracked by the daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Session name as reported by zellij; unique and stable
    pub id: String,
    pub workspace_id: String,
    /// The user's current (foreground) session
    #[serde(default)]
    pub is_attached: bool,
    /// Reported by the plugin at least once
    #[serde(default)]
    pub is_active: bool,
    /// Known but missing from the latest snapshot
    #[serde(default)]
    pub is_dead: bool,
    pub last_used_at: DateTime<Utc>,
}

impl Session {
    /// Create a detached, inactive session last used now
    pub fn new(id: impl Into<String>, workspace_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            workspace_id: workspace_id.into(),
            is_attached: false,
            is_active: false,
            is_dead: false,
            last_used_at: Utc::now(),
        }
    }

    /// Builder-style override of `last_used_at`
    pub fn with_last_used_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_used_at = at;
        self
    }
}

/// One entry in a plugin snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUpdate {
    pub name: String,
    #[serde(default)]
    pub is_current_session: bool,
}

impl SessionUpdate {
    pub fn new(name: impl Into<String>, is_current_session: bool) -> Self {
        Self {
            name: name.into(),
            is_current_session,
        }
    }
}

/// Full list of sessions the plugin knows about at one point in time
///
/// Body of `PUT /zellij/sessions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionsSnapshot {
    /// Opaque identifier the plugin attaches to each report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub sessions: Vec<SessionUpdate>,
}

impl SessionsSnapshot {
    pub fn new(sessions: Vec<SessionUpdate>) -> Self {
        Self { id: None, sessions }
    }
}
