//! Configuration loading
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `clubhub.toml` (or the file named by `CLUBHUB_CONFIG`), then
//! `CLUBHUB_*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_ENV_VAR: &str = "CLUBHUB_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "clubhub.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ClubhubConfig {
    /// Lifetime of a login session
    pub session_ttl_secs: u64,
    /// How often expired sessions are swept
    pub session_check_period_secs: u64,
    /// Load the sample school on startup
    pub seed_demo_data: bool,
    /// Password shared by every seeded account
    pub demo_password: String,
    /// `tracing_subscriber::EnvFilter` directive; overrides `--verbose`
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl ClubhubConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from);
        Self::load_from(explicit)
    }

    /// Load with `path` as the config file. An explicit path must exist;
    /// the default `clubhub.toml` is optional.
    pub fn load_from(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false),
        };

        Config::builder()
            .set_default("session_ttl_secs", 86_400_u64)?
            .set_default("session_check_period_secs", 86_400_u64)?
            .set_default("seed_demo_data", true)?
            .set_default("demo_password", "clubhub-demo")?
            .add_source(file)
            .add_source(Environment::with_prefix("CLUBHUB").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn session_check_period(&self) -> Duration {
        Duration::from_secs(self.session_check_period_secs.max(1))
    }
}
