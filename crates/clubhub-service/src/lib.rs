//! Clubhub Service
//!
//! The layer the HTTP routes call into: authorization, call-site policies,
//! authentication, configuration and demo data, wired together in
//! [`AppState`].

pub mod access;
pub mod config;
pub mod seed;
pub mod services;

use clubhub_core::{MemStorage, MemorySessionStore, Storage};
use std::sync::Arc;
use tracing::info;

pub use access::Principal;
pub use config::ClubhubConfig;
pub use services::{AuthService, ClubFilter, ClubService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub sessions: Arc<MemorySessionStore>,
    pub clubs: Arc<ClubService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Build the in-memory stores and services. Spawns the session cleanup
    /// task, so this must run inside a tokio runtime.
    pub fn new(config: &ClubhubConfig) -> Self {
        let storage: Arc<dyn Storage> = Arc::new(MemStorage::new());
        let sessions = Arc::new(MemorySessionStore::new(config.session_ttl()));
        sessions.start_cleanup_task(config.session_check_period());
        info!(
            "In-memory stores initialized (session ttl {}s)",
            config.session_ttl_secs
        );

        let clubs = Arc::new(ClubService::new(storage.clone()));
        let auth = Arc::new(AuthService::new(storage.clone(), sessions.clone()));

        Self {
            storage,
            sessions,
            clubs,
            auth,
        }
    }

    /// Build the state and load demo data when the config asks for it.
    pub async fn bootstrap(config: &ClubhubConfig) -> clubhub_core::Result<Self> {
        let state = Self::new(config);
        if config.seed_demo_data {
            seed::seed_demo_data(state.storage.as_ref(), &config.demo_password).await?;
        }
        Ok(state)
    }
}
