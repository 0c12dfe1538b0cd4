//! Random response delay settings.
//!
//! The delay injector is a testing aid: when enabled, every non-preflight
//! request waits a uniformly random number of milliseconds in
//! `[0, max_delay_ms)` before it is handled. The flag can be flipped at
//! runtime through `GET /toggle-delay`; these values only seed the initial
//! state.
//!
//! # Environment Variables
//!
//! - `DELAY_ENABLED`: start with the delay switched on (default: `false`)
//! - `DELAY_MAX_MS`: exclusive upper bound of the delay (default: `1000`)

use crate::{ConfigError, parse_var};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelayConfig {
    pub enabled: bool,
    pub max_delay_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_delay_ms: 1000,
        }
    }
}

impl DelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let max_delay_ms = parse_var(&lookup, "DELAY_MAX_MS", defaults.max_delay_ms)?;
        if max_delay_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "DELAY_MAX_MS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            enabled: parse_var(&lookup, "DELAY_ENABLED", defaults.enabled)?,
            max_delay_ms,
        })
    }
}
