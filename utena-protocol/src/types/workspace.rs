use serde::{Deserialize, Serialize};

/// A project directory sessions can belong to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub is_git_repo: bool,
}

impl Workspace {
    pub fn new(id: impl Into<String>, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: path.into(),
            is_git_repo: false,
        }
    }

    /// Builder-style override of `is_git_repo`
    pub fn git_repo(mut self, is_git_repo: bool) -> Self {
        self.is_git_repo = is_git_repo;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_roundtrip_shape() {
        let ws = Workspace::new("ws-1", "utena", "/home/me/dev/utena").git_repo(true);
        let json = serde_json::to_value(&ws).unwrap();

        assert_eq!(json["id"], "ws-1");
        assert_eq!(json["name"], "utena");
        assert_eq!(json["path"], "/home/me/dev/utena");
        assert_eq!(json["is_git_repo"], true);
    }

    #[test]
    fn test_workspace_git_flag_defaults_false() {
        let ws: Workspace =
            serde_json::from_str(r#"{"id":"ws-2","name":"example","path":"/tmp/example"}"#)
                .unwrap();
        assert!(!ws.is_git_repo);
    }
}
