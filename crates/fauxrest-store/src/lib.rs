//! # fauxrest Store
//!
//! JSON-file-backed dataset for the fauxrest API.
//!
//! The dataset is a single JSON object. Each key names a resource: arrays are
//! collections of records with an `id`, objects are singular resources.
//!
//! ```json
//! {
//!   "users": [{ "id": 1, "slug": "alice", "password": "...", "roles": ["administrator"] }],
//!   "posts": [{ "id": 1, "title": "hello" }],
//!   "profile": { "name": "demo" }
//! }
//! ```
//!
//! - [`dataset`]: [`JsonStore`], reading and mutating resources, persisting writes
//! - [`query`]: json-server style filtering, sorting and paging of collections
//! - [`users`]: the typed [`User`] record and the [`UserLookup`] trait
//! - [`error`]: [`StoreError`]

pub mod dataset;
pub mod error;
pub mod query;
pub mod users;

// Re-export commonly used types at crate root
pub use dataset::{JsonStore, Listing};
pub use error::StoreError;
pub use query::{ListQuery, Page};
pub use users::{USERS_RESOURCE, User, UserLookup};
