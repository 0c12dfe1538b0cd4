use fauxrest_core::AppError;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use thiserror::Error;

/// Why a request could not be authenticated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Requires authentication.")]
    MissingToken,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("jwt malformed")]
    Malformed,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("jwt issuer invalid")]
    InvalidIssuer,

    #[error("jwt audience invalid")]
    InvalidAudience,

    #[error("jwt missing required claim: {0}")]
    MissingClaim(String),

    #[error("jwt expired")]
    Expired,

    #[error("The token has been revoked.")]
    Revoked,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
            ErrorKind::InvalidAudience => AuthError::InvalidAudience,
            ErrorKind::MissingRequiredClaim(claim) => AuthError::MissingClaim(claim.clone()),
            _ => AuthError::Malformed,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Signing(_) => AppError::internal(err),
            other => AppError::unauthorized(other.to_string()),
        }
    }
}
