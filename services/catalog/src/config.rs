//! Service configuration loaded from `CATALOG_*` environment variables

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::time::Duration;

/// Catalog service configuration
///
/// # Environment Variables
/// - `CATALOG_BIND_ADDR`: listen address (default: `0.0.0.0:9090`)
/// - `CATALOG_STORE_TIMEOUT_SECS`: upper bound on one catalog store query (default: 10)
/// - `CATALOG_SESSION_SWEEP_SECS`: interval between expired-session sweeps (default: 300)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub bind_addr: String,
    pub store_timeout_secs: u64,
    pub session_sweep_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_addr", "0.0.0.0:9090")?
            .set_default("store_timeout_secs", 10_i64)?
            .set_default("session_sweep_secs", 300_i64)?
            .add_source(Environment::with_prefix("CATALOG").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs.max(1))
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_secs.max(1))
    }
}
