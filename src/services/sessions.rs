//! Server-side session store for the admin cookie

use std::{collections::HashMap, sync::Arc, time::Duration as StdDuration};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::{sync::RwLock, task::JoinHandle};

use crate::error::AppResult;

/// A live login session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque token carried by the session cookie
    pub id: String,
    pub user_id: i32,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Create/read/destroy sessions by token
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, user_id: i32) -> AppResult<Session>;

    /// Look up a live session and slide its expiry forward.
    /// Expired sessions read as absent.
    async fn get(&self, id: &str) -> AppResult<Option<Session>>;

    /// Returns whether a session was removed
    async fn destroy(&self, id: &str) -> AppResult<bool>;

    /// Drop every expired session, returning how many were removed
    async fn prune_expired(&self) -> AppResult<usize>;
}

pub struct MemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: i32) -> AppResult<Session> {
        let session = Session {
            id: uuid::Uuid::new_v4().simple().to_string(),
            user_id,
            expires_at: Utc::now() + self.ttl,
        };
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn get(&self, id: &str) -> AppResult<Option<Session>> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(session) if session.is_expired(now) => {
                sessions.remove(id);
                Ok(None)
            }
            Some(session) => {
                session.expires_at = now + self.ttl;
                Ok(Some(session.clone()))
            }
            None => Ok(None),
        }
    }

    async fn destroy(&self, id: &str) -> AppResult<bool> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }

    async fn prune_expired(&self) -> AppResult<usize> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        Ok(before - sessions.len())
    }
}

/// Periodically prune expired sessions. The first sweep runs one `period` after start.
pub fn spawn_session_sweeper(store: Arc<dyn SessionStore>, period: StdDuration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker =
            tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        loop {
            ticker.tick().await;
            match store.prune_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!("Pruned {} expired sessions", removed),
                Err(e) => tracing::warn!("Session sweep failed: {}", e),
            }
        }
    })
}
