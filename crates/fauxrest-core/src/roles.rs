//! Role labels recognised by the authorization gate.
//!
//! Roles are free-form strings stored on each user record in the dataset.
//! Only the labels below carry meaning inside the server.

/// Full access to the resource router.
pub const ADMINISTRATOR: &str = "administrator";
