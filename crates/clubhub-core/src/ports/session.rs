//! Session store trait for authentication tokens

use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated login session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Session store
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Open a new session for `user_id` with a fresh token.
    async fn create(&self, user_id: &str) -> Result<Session>;
    /// Expired sessions read as absent.
    async fn get(&self, token: &str) -> Result<Option<Session>>;
    async fn destroy(&self, token: &str) -> Result<bool>;
    /// Drop every expired session, returning how many were removed.
    async fn purge_expired(&self) -> Result<usize>;
}
