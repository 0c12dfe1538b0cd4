//! # fauxrest Config
//!
//! Configuration types for the fauxrest API, loaded from environment
//! variables (a `.env` file is honoured by the binary through `dotenvy`).
//!
//! - [`jwt`]: Token signing and validation settings
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`delay`]: Random response delay settings
//!
//! # Example
//!
//! ```ignore
//! use fauxrest_config::{CorsConfig, DelayConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let cors_config = CorsConfig::from_env();
//! let delay_config = DelayConfig::from_env()?;
//! ```

pub mod cors;
pub mod delay;
pub mod error;
pub mod jwt;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use delay::DelayConfig;
pub use error::ConfigError;
pub use jwt::JwtConfig;

/// Reads an optional variable and parses it, failing on unparseable values.
pub(crate) fn parse_var<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}
