//! Session Store
//!
//! Keeps every live dashboard session in memory, keyed by a UUID.
//! Each session sits behind its own mutex, so inputs for one tab are
//! applied one at a time while different tabs proceed independently.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::state::{Session, SessionId};

/// Shared handle to one session
pub type SessionHandle = Arc<Mutex<Session>>;

/// Configuration for the session store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum number of live sessions
    pub max_sessions: usize,
    /// Sessions idle longer than this are dropped
    pub idle_timeout: Duration,
    /// How often to look for idle sessions
    pub sweep_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_sessions: 256,
            idle_timeout: Duration::from_secs(60 * 60),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// In-memory map of live sessions
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    config: StoreConfig,
}

impl SessionStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Create a fresh idle session
    ///
    /// Fails once the session limit has been reached.
    pub async fn create(&self) -> Result<(SessionId, SessionHandle), StoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.config.max_sessions {
            return Err(StoreError::TooManySessions(self.config.max_sessions));
        }

        let id = Uuid::new_v4().to_string();
        let handle = Arc::new(Mutex::new(Session::new(id.clone())));
        sessions.insert(id.clone(), Arc::clone(&handle));

        tracing::info!(session_id = %id, live = sessions.len(), "Session created");
        Ok((id, handle))
    }

    /// Look up a session and mark it as in use
    ///
    /// A session that is locked is busy with an input, which refreshes it anyway.
    pub async fn get(&self, id: &str) -> Result<SessionHandle, StoreError> {
        let handle = self
            .sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Ok(mut session) = handle.try_lock() {
            session.touch();
        }
        Ok(handle)
    }

    /// Drop a session; returns whether it existed
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Session removed");
        }
        removed
    }

    /// Number of live sessions
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub fn max_sessions(&self) -> usize {
        self.config.max_sessions
    }

    /// Drop sessions idle longer than the configured timeout
    ///
    /// Sessions busy applying an input are skipped.
    pub async fn sweep_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.idle_for() < self.config.idle_timeout,
            Err(_) => true,
        });

        let swept = before - sessions.len();
        if swept > 0 {
            tracing::info!(swept, live = sessions.len(), "Swept idle sessions");
        }
        swept
    }

    /// Start the background task that sweeps idle sessions
    pub fn start_background_sweep(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        let sweep_interval = store.config.sweep_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sweep_interval);

            // Skip the first immediate tick
            ticker.tick().await;

            loop {
                ticker.tick().await;
                store.sweep_idle().await;
            }
        })
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

/// Session store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Too many sessions (limit {0})")]
    TooManySessions(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = SessionStore::default();
        let (id, _) = store.create().await.unwrap();

        let handle = store.get(&id).await.unwrap();
        assert_eq!(handle.lock().await.id(), id);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let store = SessionStore::default();
        let err = store.get("missing").await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn test_session_limit() {
        let store = SessionStore::new(StoreConfig {
            max_sessions: 1,
            ..Default::default()
        });

        store.create().await.unwrap();
        let err = store.create().await.unwrap_err();
        assert_eq!(err, StoreError::TooManySessions(1));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SessionStore::default();
        let (id, _) = store.create().await.unwrap();

        assert!(store.remove(&id).await);
        assert!(!store.remove(&id).await);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_sweep_idle() {
        let store = SessionStore::new(StoreConfig {
            idle_timeout: Duration::ZERO,
            ..Default::default()
        });
        store.create().await.unwrap();
        store.create().await.unwrap();

        assert_eq!(store.sweep_idle().await, 2);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_lookup_keeps_session_alive() {
        let store = SessionStore::new(StoreConfig {
            idle_timeout: Duration::from_millis(200),
            ..Default::default()
        });
        let (reader, _) = store.create().await.unwrap();
        store.create().await.unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        store.get(&reader).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(store.sweep_idle().await, 1);
        assert!(store.get(&reader).await.is_ok());
    }

    #[tokio::test]
    async fn test_sweep_keeps_active_sessions() {
        let store = SessionStore::default();
        store.create().await.unwrap();

        assert_eq!(store.sweep_idle().await, 0);
        assert_eq!(store.count().await, 1);
    }
}
