//! # fauxrest Core
//!
//! Core types shared by every fauxrest crate.
//!
//! - [`errors`]: HTTP-facing application error with a `{ "message" }` body
//! - [`roles`]: Well-known role labels
//!
//! # Example
//!
//! ```ignore
//! use fauxrest_core::AppError;
//!
//! let error = AppError::forbidden("Requires administrator.");
//! assert_eq!(error.status, axum::http::StatusCode::FORBIDDEN);
//! ```

pub mod errors;
pub mod roles;

// Re-export commonly used types at crate root
pub use errors::AppError;
