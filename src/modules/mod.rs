//! Feature modules. Each one keeps the same layout:
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: logic behind the handlers
//! - `model.rs`: request and response bodies
//! - `router.rs`: the module's routes
//!
//! - [`tokens`]: issuing, checking and revoking bearer tokens
//! - [`users`]: the current user
//! - [`settings`]: runtime switches (the response delay)
//! - [`resources`]: CRUD over the dataset, behind the administrator gate

pub mod resources;
pub mod settings;
pub mod tokens;
pub mod users;
