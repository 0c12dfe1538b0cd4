use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use fauxrest_auth::{MemoryRevocationList, RevocationList};
use fauxrest_config::{ConfigError, CorsConfig, DelayConfig, JwtConfig};
use fauxrest_store::{JsonStore, StoreError};
use thiserror::Error;

/// Runtime switch for the delay injector, shared by every clone of the state.
#[derive(Clone, Debug)]
pub struct DelayControl {
    enabled: Arc<AtomicBool>,
    pub max_delay_ms: u64,
}

impl DelayControl {
    pub fn new(config: &DelayConfig) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(config.enabled)),
            max_delay_ms: config.max_delay_ms,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Flips the flag and returns the new value.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::AcqRel)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub delay: DelayControl,
    pub store: JsonStore,
    pub revocations: Arc<dyn RevocationList>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("jwt_config", &self.jwt_config)
            .field("cors_config", &self.cors_config)
            .field("delay", &self.delay)
            .field("store", &self.store)
            .field("revocations", &self.revocations.len())
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load dataset: {0}")]
    Store(#[from] StoreError),
}

impl AppState {
    pub fn new(
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        delay_config: &DelayConfig,
        store: JsonStore,
    ) -> Self {
        Self {
            jwt_config,
            cors_config,
            delay: DelayControl::new(delay_config),
            store,
            revocations: Arc::new(MemoryRevocationList::new()),
        }
    }
}

/// Reads configuration from the environment and opens the dataset.
pub async fn init_app_state(database: &std::path::Path) -> Result<AppState, StartupError> {
    Ok(AppState::new(
        JwtConfig::from_env()?,
        CorsConfig::from_env(),
        &DelayConfig::from_env()?,
        JsonStore::open(database).await?,
    ))
}
