//! Shared application state and the per-user session store

use crate::config::ServerConfig;
use pipeline_facade::Session;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let sessions = SessionStore::new(config.session_ttl);
        Self {
            config: Arc::new(config),
            sessions,
        }
    }
}

struct Entry {
    session: Arc<Mutex<Session>>,
    last_seen: Instant,
}

/// Sessions keyed by the id carried in the session cookie.
///
/// Entries idle for longer than the TTL are dropped whenever the store is
/// touched.
#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<Uuid, Entry>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// The session for `id`, or a new one when the id is unknown or expired.
    ///
    /// Returns the id the caller should use from now on and whether it was
    /// newly issued.
    pub async fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, Arc<Mutex<Session>>, bool) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        self.evict(&mut entries, now);

        if let Some(id) = id {
            if let Some(entry) = entries.get_mut(&id) {
                entry.last_seen = now;
                return (id, Arc::clone(&entry.session), false);
            }
        }

        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(Session::new()));
        entries.insert(
            id,
            Entry {
                session: Arc::clone(&session),
                last_seen: now,
            },
        );
        tracing::debug!(%id, active = entries.len(), "session created");
        (id, session, true)
    }

    /// An existing, unexpired session
    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        self.evict(&mut entries, now);
        entries.get_mut(&id).map(|entry| {
            entry.last_seen = now;
            Arc::clone(&entry.session)
        })
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn evict(&self, entries: &mut HashMap<Uuid, Entry>, now: Instant) {
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.last_seen) <= self.ttl);
        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::info!(evicted, active = entries.len(), "expired sessions dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reuses_known_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let (id, first, created) = store.get_or_create(None).await;
        assert!(created);

        let (same_id, second, created) = store.get_or_create(Some(id)).await;
        assert!(!created);
        assert_eq!(same_id, id);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_gets_new_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let stranger = Uuid::new_v4();
        let (id, _, created) = store.get_or_create(Some(stranger)).await;
        assert!(created);
        assert_ne!(id, stranger);
        assert!(store.get(stranger).await.is_none());
        assert!(store.get(id).await.is_some());
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let store = SessionStore::new(Duration::ZERO);
        let (id, _, _) = store.get_or_create(None).await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert!(store.get(id).await.is_none());
        assert!(store.is_empty().await);
    }
}
