//! In-memory session store using DashMap, with TTL and periodic cleanup

use crate::{Result, Session, SessionStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::RngCore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Session store keyed by token. Every session expires `ttl` after creation.
pub struct MemorySessionStore {
    sessions: Arc<DashMap<String, Session>>,
    ttl: chrono::Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365 * 100)),
        }
    }

    /// Spawn a task that evicts expired sessions every `period`.
    /// Must be called from within a tokio runtime.
    pub fn start_cleanup_task(&self, period: Duration) -> JoinHandle<()> {
        let sessions = self.sessions.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let removed = evict_expired(&sessions);
                if removed > 0 {
                    debug!("Session cleanup removed {} expired sessions", removed);
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn generate_token() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

fn evict_expired(sessions: &DashMap<String, Session>) -> usize {
    let now = Utc::now();
    let before = sessions.len();
    sessions.retain(|_, session| !session.is_expired_at(now));
    before.saturating_sub(sessions.len())
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: &str) -> Result<Session> {
        let now = Utc::now();
        let session = Session {
            token: Self::generate_token(),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.sessions
            .insert(session.token.clone(), session.clone());

        info!("Opened session for user {}", user_id);
        Ok(session)
    }

    async fn get(&self, token: &str) -> Result<Option<Session>> {
        let session = match self.sessions.get(token) {
            Some(entry) => entry.clone(),
            None => return Ok(None),
        };

        if session.is_expired_at(Utc::now()) {
            self.sessions.remove(token);
            return Ok(None);
        }
        Ok(Some(session))
    }

    async fn destroy(&self, token: &str) -> Result<bool> {
        Ok(self.sessions.remove(token).is_some())
    }

    async fn purge_expired(&self) -> Result<usize> {
        Ok(evict_expired(&self.sessions))
    }
}
