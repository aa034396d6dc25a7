//! Concurrent in-memory session store

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use utena_protocol::Session;
use utena_utils::{Result, UtenaError};

/// Most recently used first, ties broken by id
pub(crate) fn mru_order(a: &Session, b: &Session) -> Ordering {
    b.last_used_at
        .cmp(&a.last_used_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Reject sessions with an empty id or workspace id
pub(crate) fn check_keys(session: &Session) -> Result<()> {
    if session.id.is_empty() {
        return Err(UtenaError::invalid_argument("session id must not be empty"));
    }
    if session.workspace_id.is_empty() {
        return Err(UtenaError::invalid_argument(format!(
            "session {} has an empty workspace id",
            session.id
        )));
    }
    Ok(())
}

/// Keyed session store guarded by one reader/writer lock
///
/// Every read hands out a copy; callers never hold references into the map.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, session: Session) -> Result<()> {
        check_keys(&session)?;

        let mut sessions = self.sessions.write();
        if sessions.contains_key(&session.id) {
            return Err(UtenaError::SessionExists(session.id));
        }
        sessions.insert(session.id.clone(), session);
        Ok(())
    }

    /// Replace a stored session wholesale
    ///
    /// `last_used_at` never moves backwards: an older incoming timestamp is
    /// replaced by the stored one.
    pub fn update(&self, mut session: Session) -> Result<Session> {
        check_keys(&session)?;

        let mut sessions = self.sessions.write();
        let stored = sessions
            .get_mut(&session.id)
            .ok_or_else(|| UtenaError::SessionNotFound(session.id.clone()))?;

        if session.last_used_at < stored.last_used_at {
            session.last_used_at = stored.last_used_at;
        }
        *stored = session;
        Ok(stored.clone())
    }

    pub fn get(&self, id: &str) -> Result<Session> {
        self.sessions
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| UtenaError::SessionNotFound(id.to_string()))
    }

    pub fn delete(&self, id: &str) -> Result<Session> {
        self.sessions
            .write()
            .remove(id)
            .ok_or_else(|| UtenaError::SessionNotFound(id.to_string()))
    }

    /// Raise `last_used_at` to `now` unless it is already later
    pub fn touch(&self, id: &str, now: DateTime<Utc>) -> Result<Session> {
        let mut sessions = self.sessions.write();
        let stored = sessions
            .get_mut(id)
            .ok_or_else(|| UtenaError::SessionNotFound(id.to_string()))?;

        if now > stored.last_used_at {
            stored.last_used_at = now;
        }
        Ok(stored.clone())
    }

    /// All sessions in MRU order
    pub fn list(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self.sessions.read().values().cloned().collect();
        sessions.sort_by(mru_order);
        sessions
    }

    /// Sessions of one workspace in MRU order
    pub fn list_by_workspace(&self, workspace_id: &str) -> Vec<Session> {
        let mut sessions: Vec<Session> = self
            .sessions
            .read()
            .values()
            .filter(|s| s.workspace_id == workspace_id)
            .cloned()
            .collect();
        sessions.sort_by(mru_order);
        sessions
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, 0).unwrap()
    }

    fn session(id: &str, ws: &str, minute: u32) -> Session {
        Session::new(id, ws).with_last_used_at(at(minute))
    }

    // ==================== Add Tests ====================

    #[test]
    fn test_add_and_get() {
        let registry = SessionRegistry::new();
        registry.add(session("main", "ws-1", 0)).unwrap();

        let fetched = registry.get("main").unwrap();
        assert_eq!(fetched.workspace_id, "ws-1");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_add_duplicate_fails() {
        let registry = SessionRegistry::new();
        registry.add(session("main", "ws-1", 0)).unwrap();

        let result = registry.add(session("main", "ws-2", 1));
        assert!(matches!(result, Err(UtenaError::SessionExists(id)) if id == "main"));
        assert_eq!(registry.get("main").unwrap().workspace_id, "ws-1");
    }

    #[test]
    fn test_add_rejects_empty_keys() {
        let registry = SessionRegistry::new();

        assert!(matches!(
            registry.add(session("", "ws-1", 0)),
            Err(UtenaError::InvalidArgument(_))
        ));
        assert!(matches!(
            registry.add(session("main", "", 0)),
            Err(UtenaError::InvalidArgument(_))
        ));
        assert!(registry.is_empty());
    }

    // ==================== Update Tests ====================

    #[test]
    fn test_update_replaces_fields() {
        let registry = SessionRegistry::new();
        registry.add(session("main", "ws-1", 0)).unwrap();

        let mut changed = session("main", "ws-2", 5);
        changed.is_attached = true;
        registry.update(changed).unwrap();

        let stored = registry.get("main").unwrap();
        assert_eq!(stored.workspace_id, "ws-2");
        assert!(stored.is_attached);
        assert_eq!(stored.last_used_at, at(5));
    }

    #[test]
    fn test_update_keeps_later_timestamp() {
        let registry = SessionRegistry::new();
        registry.add(session("main", "ws-1", 30)).unwrap();

        let stored = registry.update(session("main", "ws-1", 10)).unwrap();
        assert_eq!(stored.last_used_at, at(30));
    }

    #[test]
    fn test_update_missing_fails() {
        let registry = SessionRegistry::new();
        let result = registry.update(session("ghost", "ws-1", 0));
        assert!(matches!(result, Err(UtenaError::SessionNotFound(_))));
    }

    // ==================== Delete / Touch Tests ====================

    #[test]
    fn test_delete() {
        let registry = SessionRegistry::new();
        registry.add(session("main", "ws-1", 0)).unwrap();

        registry.delete("main").unwrap();
        assert!(!registry.contains("main"));
        assert!(matches!(
            registry.delete("main"),
            Err(UtenaError::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_touch_is_monotonic() {
        let registry = SessionRegistry::new();
        registry.add(session("main", "ws-1", 10)).unwrap();

        assert_eq!(registry.touch("main", at(20)).unwrap().last_used_at, at(20));
        assert_eq!(registry.touch("main", at(15)).unwrap().last_used_at, at(20));
        assert!(registry.touch("ghost", at(0)).is_err());
    }

    // ==================== Ordering Tests ====================

    #[test]
    fn test_list_mru_order_with_id_tiebreak() {
        let registry = SessionRegistry::new();
        registry.add(session("b", "ws-1", 10)).unwrap();
        registry.add(session("a", "ws-1", 10)).unwrap();
        registry.add(session("c", "ws-1", 20)).unwrap();
        registry.add(session("d", "ws-1", 5)).unwrap();

        let ids: Vec<String> = registry.list().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_list_by_workspace_filters() {
        let registry = SessionRegistry::new();
        registry.add(session("api", "ws-1", 1)).unwrap();
        registry.add(session("web", "ws-2", 2)).unwrap();
        registry.add(session("db", "ws-1", 3)).unwrap();

        let ids: Vec<String> = registry
            .list_by_workspace("ws-1")
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["db", "api"]);
        assert!(registry.list_by_workspace("ws-9").is_empty());
    }

    #[test]
    fn test_list_returns_copies() {
        let registry = SessionRegistry::new();
        registry.add(session("main", "ws-1", 0)).unwrap();

        let mut listed = registry.list();
        listed[0].is_dead = true;

        assert!(!registry.get("main").unwrap().is_dead);
    }

    // ==================== Concurrency Tests ====================

    #[test]
    fn test_concurrent_adds_are_unique() {
        let registry = Arc::new(SessionRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.add(session("main", "ws-1", 0)).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_concurrent_touches_keep_maximum() {
        let registry = Arc::new(SessionRegistry::new());
        registry.add(session("main", "ws-1", 0)).unwrap();

        let base = at(0);
        let handles: Vec<_> = (1..=16)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry.touch("main", base + Duration::seconds(i)).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            registry.get("main").unwrap().last_used_at,
            base + Duration::seconds(16)
        );
    }
}
