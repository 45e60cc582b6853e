// src/infra/session.rs — Session store
//
// Maps an opaque session id to a live interview session. The store is passed
// by reference into the orchestrator; `InMemorySessionStore` is the volatile
// default. Each entry sits behind its own async mutex so one request at a
// time can mutate a given session.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;

use crate::core::session::InterviewSession;
use crate::infra::errors::{InterviewError, Result};

/// Shared handle to one session. Lock it for the whole mutation section.
pub type SessionHandle = Arc<Mutex<InterviewSession>>;

/// Key-value registry of live sessions. No operation creates a session implicitly.
pub trait SessionStore: Send + Sync {
    /// Register a session under `id`. Fails if the id is already taken.
    fn create(&self, id: &str, session: InterviewSession) -> Result<SessionHandle>;

    /// `None` means the id is unknown.
    fn get(&self, id: &str) -> Option<SessionHandle>;

    /// Remove the entry, returning it if it was present.
    fn delete(&self, id: &str) -> Option<SessionHandle>;

    fn exists(&self, id: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, id: &str, session: InterviewSession) -> Result<SessionHandle> {
        let mut map = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        if map.contains_key(id) {
            return Err(InterviewError::DuplicateSession { id: id.to_string() });
        }
        let handle = Arc::new(Mutex::new(session));
        map.insert(id.to_string(), handle.clone());
        tracing::debug!(session_id = id, live = map.len(), "Session created");
        Ok(handle)
    }

    fn get(&self, id: &str) -> Option<SessionHandle> {
        let map = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        map.get(id).cloned()
    }

    fn delete(&self, id: &str) -> Option<SessionHandle> {
        let mut map = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let removed = map.remove(id);
        if removed.is_some() {
            tracing::debug!(session_id = id, live = map.len(), "Session deleted");
        }
        removed
    }

    fn exists(&self, id: &str) -> bool {
        let map = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        map.contains_key(id)
    }

    fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::*;

    fn session() -> InterviewSession {
        InterviewSession::new(
            CompanyProfile {
                name: "Initech".into(),
                organization_type: "enterprise".into(),
                role: "SRE".into(),
                seniority: "senior".into(),
            },
            CandidateProfile {
                name: "Alex Kim".into(),
                resume_text: String::new(),
            },
            InterviewKind::Hr,
        )
    }

    #[test]
    fn test_create_get_delete() {
        let store = InMemorySessionStore::new();
        let s = session();
        let id = s.id().to_string();

        store.create(&id, s).unwrap();
        assert!(store.exists(&id));
        assert!(store.get(&id).is_some());
        assert_eq!(store.len(), 1);

        assert!(store.delete(&id).is_some());
        assert!(!store.exists(&id));
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_absent_is_none() {
        let store = InMemorySessionStore::new();
        assert!(store.get("missing").is_none());
        assert!(store.delete("missing").is_none());
    }

    #[test]
    fn test_duplicate_create_rejected() {
        let store = InMemorySessionStore::new();
        store.create("same", session()).unwrap();
        let err = store.create("same", session()).unwrap_err();
        assert!(matches!(err, InterviewError::DuplicateSession { .. }));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_handle_outlives_delete() {
        let store = InMemorySessionStore::new();
        let handle = store.create("s1", session()).unwrap();
        store.delete("s1");
        // An in-flight request keeps its handle; new lookups fail.
        assert_eq!(handle.lock().await.company().name, "Initech");
        assert!(store.get("s1").is_none());
    }
}
