//! Token payload structures.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AuthError;

/// Registered claims carried by every bearer token.
///
/// - `sub`: the user's slug
/// - `iss` / `aud`: copied from configuration and checked on every request
/// - `iat` / `exp`: issue and expiry time (Unix seconds)
/// - `jti`: unique token id, the key used by the revocation list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl Claims {
    pub fn slug(&self) -> &str {
        &self.sub
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Last Unix second at which the token still verifies once `leeway_secs`
    /// of clock skew is allowed. Verification rejects only `exp + leeway < now`.
    pub fn honoured_until(&self, leeway_secs: u64) -> i64 {
        self.exp
            .saturating_add(i64::try_from(leeway_secs).unwrap_or(i64::MAX))
    }

    pub fn is_expired_at(&self, now: i64, leeway_secs: u64) -> bool {
        self.honoured_until(leeway_secs) < now
    }
}

/// A freshly signed token together with the claims it encodes.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Result of checking a presented token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenStatus {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TokenStatus {
    pub fn valid(claims: &Claims) -> Self {
        Self {
            valid: true,
            subject: Some(claims.sub.clone()),
            expires_at: Some(claims.expires_at()),
            message: None,
        }
    }

    pub fn invalid(reason: &AuthError) -> Self {
        Self {
            valid: false,
            subject: None,
            expires_at: None,
            message: Some(reason.to_string()),
        }
    }
}
