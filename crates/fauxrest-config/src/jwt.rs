//! Token signing and validation settings.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: HMAC signing secret (required)
//! - `JWT_ISSUER`: value of the `iss` claim issued and expected (required)
//! - `JWT_AUDIENCE`: value of the `aud` claim issued and expected (required)
//! - `JWT_EXPIRY`: token lifetime in seconds (default: `3600`)
//! - `JWT_LEEWAY`: clock skew tolerance in seconds when checking `exp` (default: `0`)
//! - `REVOCATION_PRUNE_INTERVAL_SECS`: how often expired revocations are dropped (default: `300`)
//!
//! There are deliberately no defaults for the secret, issuer or audience.

use crate::{ConfigError, parse_var};

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expiry_secs: i64,
    pub leeway_secs: u64,
    pub revocation_prune_interval_secs: u64,
}

// Keeps the secret out of logs and `#[instrument]` spans.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiry_secs", &self.expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field(
                "revocation_prune_interval_secs",
                &self.revocation_prune_interval_secs,
            )
            .finish_non_exhaustive()
    }
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let expiry_secs = parse_var(&lookup, "JWT_EXPIRY", 3600_i64)?;
        if expiry_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRY",
                value: expiry_secs.to_string(),
            });
        }

        Ok(Self {
            secret: required("JWT_SECRET")?,
            issuer: required("JWT_ISSUER")?,
            audience: required("JWT_AUDIENCE")?,
            expiry_secs,
            leeway_secs: parse_var(&lookup, "JWT_LEEWAY", 0)?,
            revocation_prune_interval_secs: parse_var(
                &lookup,
                "REVOCATION_PRUNE_INTERVAL_SECS",
                300,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("JWT_SECRET", "test-secret-key-at-least-32-characters-long"),
        ("JWT_ISSUER", "fauxrest-test"),
        ("JWT_AUDIENCE", "fauxrest-clients"),
    ];

    #[test]
    fn test_from_lookup_with_required_values() {
        let config = JwtConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.issuer, "fauxrest-test");
        assert_eq!(config.audience, "fauxrest-clients");
        assert_eq!(config.expiry_secs, 3600);
        assert_eq!(config.leeway_secs, 0);
        assert_eq!(config.revocation_prune_interval_secs, 300);
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let vars = [REQUIRED[1], REQUIRED[2]];
        let err = JwtConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_blank_audience_counts_as_missing() {
        let vars = [REQUIRED[0], REQUIRED[1], ("JWT_AUDIENCE", "   ")];
        let err = JwtConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_AUDIENCE"));
    }

    #[test]
    fn test_custom_expiry() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("JWT_EXPIRY", "120"));
        let config = JwtConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.expiry_secs, 120);
    }

    #[test]
    fn test_non_positive_expiry_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("JWT_EXPIRY", "-5"));
        let err = JwtConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "JWT_EXPIRY", .. }));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = JwtConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("JwtConfig"));
        assert!(!debug_str.contains("test-secret-key"));
    }
}
