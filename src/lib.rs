//! # fauxrest
//!
//! A fake REST API: a JSON dataset exposed as json-server style CRUD routes,
//! guarded by bearer tokens and an administrator role, with an optional
//! random response delay for exercising slow-network handling in clients.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── fauxrest-core/    # AppError, role names
//! ├── fauxrest-config/  # JWT, CORS and delay settings
//! ├── fauxrest-auth/    # token issue / verify / revoke, revocation list
//! └── fauxrest-store/   # JSON dataset, list queries, user lookup
//! src/
//! ├── middleware/       # authenticate, role gate, delay, security headers
//! ├── modules/          # tokens, users, settings, resources
//! ├── router.rs         # route table and layer stack
//! └── state.rs          # AppState shared by handlers
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Access |
//! |--------|------|--------|
//! | POST | `/tokens` | public, exchanges `{ username, password }` for a token |
//! | GET | `/tokens[/{token}]` | public, reports whether a token is honoured |
//! | DELETE | `/tokens[/{token}]` | needs a correctly signed token, revokes it |
//! | GET | `/users/me` | any valid token |
//! | GET | `/toggle-delay` | public, flips the response delay |
//! | any | everything else | valid token of a user with the `administrator` role |
//!
//! Tokens are read from the `{token}` path segment, the
//! `Authorization: Bearer` header or the `token` query parameter, in that
//! order.
//!
//! ## Environment Variables
//!
//! ```bash
//! JWT_SECRET=change-me
//! JWT_ISSUER=fauxrest
//! JWT_AUDIENCE=fauxrest-clients
//! JWT_EXPIRY=3600
//! ALLOWED_ORIGINS=http://localhost:5173
//! DELAY_ENABLED=false
//! DATABASE_PATH=database.json
//! ```
//!
//! API documentation is served at `/swagger-ui`.

pub mod cli;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use fauxrest_auth;
pub use fauxrest_config;
pub use fauxrest_core;
pub use fauxrest_store;
