//! Middleware and extractors for cross-cutting request handling.
//!
//! - [`auth`]: token extraction, the `authenticate` gate and the [`AuthUser`](auth::AuthUser) extractor
//! - [`role`]: role checks against the user dataset
//! - [`delay`]: the random response delay
//! - [`security_headers`]: hardening and no-cache response headers
//!
//! # Request Flow
//!
//! 1. `authenticate` looks for a token (path, then `Authorization: Bearer`,
//!    then `?token=`). A bad token is rejected with 401; no token passes
//!    through anonymously.
//! 2. `require_administrator` rejects anonymous requests with 401 and users
//!    lacking the `administrator` role with 403.
//! 3. Handlers that only need an identity take [`AuthUser`](auth::AuthUser).

pub mod auth;
pub mod delay;
pub mod role;
pub mod security_headers;
