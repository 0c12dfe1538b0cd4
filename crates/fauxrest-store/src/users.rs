use std::collections::BTreeSet;
use std::future::Future;

use bcrypt::{DEFAULT_COST, hash, verify};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;
use utoipa::ToSchema;

use crate::dataset::JsonStore;
use crate::error::StoreError;

/// Name of the collection holding user records.
pub const USERS_RESOURCE: &str = "users";

/// A record of the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub id: Value,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<String>,
    /// bcrypt hash, never rendered in responses.
    #[serde(rename = "password", default, skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Checks `password` against the stored hash. A missing or corrupt hash
    /// never verifies.
    pub fn verify_password(&self, password: &str) -> bool {
        verify(password, &self.password_hash).unwrap_or(false)
    }
}

pub fn hash_password(password: &str) -> Result<String, StoreError> {
    Ok(hash(password, DEFAULT_COST)?)
}

/// bcrypt hashes start with `$2a$`, `$2b$` or `$2y$`.
pub fn is_password_hash(value: &str) -> bool {
    value.starts_with("$2")
}

/// Resolves users for the token service and the role gate.
pub trait UserLookup: Send + Sync {
    /// The user with `slug`, or [`StoreError::UserNotFound`].
    fn find_by_slug(&self, slug: &str) -> impl Future<Output = Result<User, StoreError>> + Send;

    /// The user whose slug or email equals `username`.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;
}

fn parse_user(record: Value) -> Result<User, StoreError> {
    serde_json::from_value(record)
        .map_err(|e| StoreError::InvalidDataset(format!("malformed user record: {e}")))
}

impl UserLookup for JsonStore {
    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> Result<User, StoreError> {
        self.find_where(USERS_RESOURCE, |record| record["slug"] == slug)
            .await?
            .map(parse_user)
            .transpose()?
            .ok_or_else(|| StoreError::UserNotFound(slug.to_string()))
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.find_where(USERS_RESOURCE, |record| {
            record["slug"] == username || record["email"] == username
        })
        .await?
        .map(parse_user)
        .transpose()
    }
}
