//! Issuing, verifying and revoking bearer tokens.
//!
//! Verification is split in two steps so the revocation lookup stays an
//! ordinary function call rather than a hook inside the decoder:
//!
//! 1. [`verify_token`]: signature, issuer, audience, expiry
//! 2. [`ensure_not_revoked`]: consults a [`RevocationList`]
//!
//! [`authenticate_token`] chains the two with `Result::and_then`.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{debug, instrument};
use uuid::Uuid;

use fauxrest_config::JwtConfig;

use crate::claims::{Claims, IssuedToken, TokenStatus};
use crate::error::AuthError;
use crate::revocation::RevocationList;

fn validation(jwt_config: &JwtConfig, check_expiry: bool) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&jwt_config.issuer]);
    validation.set_audience(&[&jwt_config.audience]);
    validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
    validation.leeway = jwt_config.leeway_secs;
    validation.validate_exp = check_expiry;
    validation
}

fn decode_claims(
    token: &str,
    jwt_config: &JwtConfig,
    check_expiry: bool,
) -> Result<Claims, AuthError> {
    if token.trim().is_empty() {
        return Err(AuthError::MissingToken);
    }

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation(jwt_config, check_expiry),
    )
    .map(|data| data.claims)
    .map_err(AuthError::from)
}

/// Signs a new token asserting `slug`, valid for `jwt_config.expiry_secs`.
///
/// Every token gets a fresh UUID v4 `jti`, so two tokens issued for the same
/// user in the same second are still individually revocable.
pub fn create_token(slug: &str, jwt_config: &JwtConfig) -> Result<IssuedToken, AuthError> {
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: slug.to_string(),
        iss: jwt_config.issuer.clone(),
        aud: jwt_config.audience.clone(),
        iat: now,
        exp: now + jwt_config.expiry_secs,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))?;

    Ok(IssuedToken { token, claims })
}

/// Checks signature, issuer, audience and expiry. Does not look at revocations.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AuthError> {
    decode_claims(token, jwt_config, true)
}

/// Passes the claims through unless their `jti` has been revoked.
pub fn ensure_not_revoked(
    claims: Claims,
    revocations: &dyn RevocationList,
) -> Result<Claims, AuthError> {
    if revocations.is_revoked(&claims.jti) {
        return Err(AuthError::Revoked);
    }
    Ok(claims)
}

/// Full check applied to every presented token.
pub fn authenticate_token(
    token: &str,
    jwt_config: &JwtConfig,
    revocations: &dyn RevocationList,
) -> Result<Claims, AuthError> {
    verify_token(token, jwt_config).and_then(|claims| ensure_not_revoked(claims, revocations))
}

/// Reports whether `token` would currently be honoured.
pub fn check_token(
    token: &str,
    jwt_config: &JwtConfig,
    revocations: &dyn RevocationList,
) -> TokenStatus {
    match authenticate_token(token, jwt_config, revocations) {
        Ok(claims) => TokenStatus::valid(&claims),
        Err(reason) => TokenStatus::invalid(&reason),
    }
}

/// Adds the token's `jti` to the revocation list.
///
/// The signature must verify, but expiry and prior revocation are ignored so
/// revoking twice, or revoking a token that already lapsed, succeeds. Tokens
/// past `exp` plus the configured leeway are not recorded since expiry
/// already rejects them. Recorded entries live until that same moment.
#[instrument(skip_all)]
pub fn revoke_token(
    token: &str,
    jwt_config: &JwtConfig,
    revocations: &dyn RevocationList,
) -> Result<Claims, AuthError> {
    revoke_token_at(token, jwt_config, revocations, Utc::now().timestamp())
}

fn revoke_token_at(
    token: &str,
    jwt_config: &JwtConfig,
    revocations: &dyn RevocationList,
    now: i64,
) -> Result<Claims, AuthError> {
    let claims = decode_claims(token, jwt_config, false)?;

    if claims.is_expired_at(now, jwt_config.leeway_secs) {
        debug!(token.jti = %claims.jti, "Skipping revocation of expired token");
    } else {
        revocations.revoke(&claims.jti, claims.honoured_until(jwt_config.leeway_secs));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revocation::MemoryRevocationList;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            issuer: "fauxrest-test".to_string(),
            audience: "fauxrest-clients".to_string(),
            expiry_secs: 3600,
            leeway_secs: 0,
            revocation_prune_interval_secs: 300,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn expired_claims(config: &JwtConfig) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: "alice".to_string(),
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
            iat: now - 7200,
            exp: now - 3600,
            jti: Uuid::new_v4().to_string(),
        }
    }

    #[test]
    fn test_create_token_success() {
        let config = get_test_jwt_config();
        let issued = create_token("alice", &config).unwrap();

        assert!(!issued.token.is_empty());
        assert_eq!(issued.claims.sub, "alice");
        assert_eq!(issued.claims.iss, "fauxrest-test");
        assert_eq!(issued.claims.aud, "fauxrest-clients");
        assert_eq!(issued.claims.exp - issued.claims.iat, config.expiry_secs);
    }

    #[test]
    fn test_verify_token_success() {
        let config = get_test_jwt_config();
        let issued = create_token("alice", &config).unwrap();

        let claims = verify_token(&issued.token, &config).unwrap();

        assert_eq!(claims, issued.claims);
        assert_eq!(claims.slug(), "alice");
    }

    #[test]
    fn test_tokens_get_distinct_ids() {
        let config = get_test_jwt_config();
        let first = create_token("alice", &config).unwrap();
        let second = create_token("alice", &config).unwrap();

        assert_ne!(first.claims.jti, second.claims.jti);
        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = get_test_jwt_config();
        let issued = create_token("alice", &config).unwrap();

        let wrong_config = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            ..get_test_jwt_config()
        };

        assert_eq!(
            verify_token(&issued.token, &wrong_config),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_verify_token_wrong_audience() {
        let config = get_test_jwt_config();
        let issued = create_token("alice", &config).unwrap();

        let other = JwtConfig {
            audience: "someone-else".to_string(),
            ..get_test_jwt_config()
        };

        assert_eq!(
            verify_token(&issued.token, &other),
            Err(AuthError::InvalidAudience)
        );
    }

    #[test]
    fn test_verify_token_wrong_issuer() {
        let config = get_test_jwt_config();
        let issued = create_token("alice", &config).unwrap();

        let other = JwtConfig {
            issuer: "elsewhere".to_string(),
            ..get_test_jwt_config()
        };

        assert_eq!(
            verify_token(&issued.token, &other),
            Err(AuthError::InvalidIssuer)
        );
    }

    #[test]
    fn test_verify_token_expired() {
        let config = get_test_jwt_config();
        let token = sign(&expired_claims(&config), &config.secret);

        assert_eq!(verify_token(&token, &config), Err(AuthError::Expired));
    }

    #[test]
    fn test_verify_token_malformed() {
        let config = get_test_jwt_config();

        for token in ["invalid-token", "not.enough", "!!!.invalid.chars", "header.payload."] {
            assert!(verify_token(token, &config).is_err(), "{token} verified");
        }
        assert_eq!(verify_token("", &config), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_authenticate_rejects_revoked() {
        let config = get_test_jwt_config();
        let revocations = MemoryRevocationList::new();
        let issued = create_token("alice", &config).unwrap();

        assert!(authenticate_token(&issued.token, &config, &revocations).is_ok());

        revocations.revoke(&issued.claims.jti, issued.claims.exp);

        assert_eq!(
            authenticate_token(&issued.token, &config, &revocations),
            Err(AuthError::Revoked)
        );
    }

    #[test]
    fn test_check_token_reports_status() {
        let config = get_test_jwt_config();
        let revocations = MemoryRevocationList::new();
        let issued = create_token("alice", &config).unwrap();

        let status = check_token(&issued.token, &config, &revocations);
        assert!(status.valid);
        assert_eq!(status.subject.as_deref(), Some("alice"));

        revoke_token(&issued.token, &config, &revocations).unwrap();

        let status = check_token(&issued.token, &config, &revocations);
        assert!(!status.valid);
        assert_eq!(status.message.as_deref(), Some("The token has been revoked."));
    }

    #[test]
    fn test_expired_token_invalid_regardless_of_revocation() {
        let config = get_test_jwt_config();
        let revocations = MemoryRevocationList::new();
        let claims = expired_claims(&config);
        let token = sign(&claims, &config.secret);

        assert_eq!(
            check_token(&token, &config, &revocations).message.as_deref(),
            Some("jwt expired")
        );

        revocations.revoke(&claims.jti, Utc::now().timestamp() + 60);
        assert_eq!(
            check_token(&token, &config, &revocations).message.as_deref(),
            Some("jwt expired")
        );
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let config = get_test_jwt_config();
        let revocations = MemoryRevocationList::new();
        let issued = create_token("alice", &config).unwrap();

        revoke_token(&issued.token, &config, &revocations).unwrap();
        revoke_token(&issued.token, &config, &revocations).unwrap();

        assert_eq!(revocations.len(), 1);
    }

    #[test]
    fn test_revoke_expired_token_records_nothing() {
        let config = get_test_jwt_config();
        let revocations = MemoryRevocationList::new();
        let token = sign(&expired_claims(&config), &config.secret);

        let claims = revoke_token(&token, &config, &revocations).unwrap();

        assert_eq!(claims.sub, "alice");
        assert!(revocations.is_empty());
    }

    #[test]
    fn test_revoke_within_leeway_is_recorded() {
        let config = JwtConfig {
            leeway_secs: 60,
            ..get_test_jwt_config()
        };
        let revocations = MemoryRevocationList::new();
        let now = Utc::now().timestamp();
        let claims = Claims {
            exp: now - 10,
            ..expired_claims(&config)
        };
        let token = sign(&claims, &config.secret);

        assert!(check_token(&token, &config, &revocations).valid);

        revoke_token(&token, &config, &revocations).unwrap();

        assert_eq!(revocations.len(), 1);
        assert_eq!(
            authenticate_token(&token, &config, &revocations),
            Err(AuthError::Revoked)
        );
    }

    #[test]
    fn test_revocation_survives_prune_until_leeway_ends() {
        let config = JwtConfig {
            leeway_secs: 60,
            ..get_test_jwt_config()
        };
        let revocations = MemoryRevocationList::new();
        let issued = create_token("alice", &config).unwrap();
        let exp = issued.claims.exp;

        revoke_token(&issued.token, &config, &revocations).unwrap();

        assert_eq!(revocations.prune(exp + 5), 0);
        assert!(revocations.is_revoked(&issued.claims.jti));
        assert_eq!(revocations.prune(exp + 60), 0);
        assert_eq!(revocations.prune(exp + 61), 1);
    }

    #[test]
    fn test_revoke_at_exact_expiry_is_recorded() {
        let config = get_test_jwt_config();
        let revocations = MemoryRevocationList::new();
        let issued = create_token("alice", &config).unwrap();

        revoke_token_at(&issued.token, &config, &revocations, issued.claims.exp).unwrap();
        assert!(revocations.is_revoked(&issued.claims.jti));

        let other = create_token("bob", &config).unwrap();
        revoke_token_at(&other.token, &config, &revocations, other.claims.exp + 1).unwrap();
        assert!(!revocations.is_revoked(&other.claims.jti));
    }

    #[test]
    fn test_revoke_forged_token_fails() {
        let config = get_test_jwt_config();
        let revocations = MemoryRevocationList::new();
        let claims = create_token("alice", &config).unwrap().claims;
        let forged = sign(&claims, "not-the-real-secret-but-long-enough");

        assert_eq!(
            revoke_token(&forged, &config, &revocations).unwrap_err(),
            AuthError::InvalidSignature
        );
        assert!(revocations.is_empty());
    }
}
