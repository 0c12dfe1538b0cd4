//! # fauxrest Auth
//!
//! Bearer token lifecycle for the fauxrest API.
//!
//! - [`claims`]: the token payload and the status report returned by checks
//! - [`jwt`]: issuing, verifying, checking and revoking tokens
//! - [`revocation`]: the set of token ids invalidated before their expiry
//! - [`error`]: authentication failures
//!
//! A presented token is honoured only when its signature, issuer and audience
//! verify against the current [`JwtConfig`](fauxrest_config::JwtConfig), it has
//! not expired, and its `jti` is absent from the [`RevocationList`]. The two
//! halves are separate functions composed in [`authenticate_token`]:
//!
//! ```ignore
//! use fauxrest_auth::{MemoryRevocationList, authenticate_token, create_token};
//!
//! let revocations = MemoryRevocationList::new();
//! let issued = create_token("alice", &config)?;
//! let claims = authenticate_token(&issued.token, &config, &revocations)?;
//! assert_eq!(claims.slug(), "alice");
//! ```

pub mod claims;
pub mod error;
pub mod jwt;
pub mod revocation;

// Re-export commonly used types at crate root
pub use claims::{Claims, IssuedToken, TokenStatus};
pub use error::AuthError;
pub use jwt::{
    authenticate_token, check_token, create_token, ensure_not_revoked, revoke_token, verify_token,
};
pub use revocation::{MemoryRevocationList, RevocationList};
