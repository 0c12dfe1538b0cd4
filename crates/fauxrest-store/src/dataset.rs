use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::StoreError;
use crate::query::{ListQuery, Page};
use crate::users::{USERS_RESOURCE, hash_password, is_password_hash};

/// Result of reading a resource by name.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    Collection(Page),
    Singular(Value),
}

/// Shared handle to the dataset. Cloning is cheap; all clones see the same
/// data and write to the same file.
#[derive(Clone)]
pub struct JsonStore {
    inner: Arc<Inner>,
}

struct Inner {
    path: Option<PathBuf>,
    data: RwLock<Map<String, Value>>,
}

impl fmt::Debug for JsonStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonStore")
            .field("path", &self.inner.path)
            .finish_non_exhaustive()
    }
}

impl JsonStore {
    /// Loads the dataset at `path`. Plaintext seed passwords are hashed and
    /// the file is rewritten before the store is returned.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let raw = tokio::fs::read_to_string(&path).await?;
        let (data, hashed) = prepare(serde_json::from_str(&raw)?)?;

        if hashed > 0 {
            info!(hashed, "Hashed plaintext seed passwords");
            write_atomically(&path, &data).await?;
        }

        info!(resources = data.len(), "Dataset loaded");
        Ok(Self::from_parts(Some(path), data))
    }

    /// Builds a store that lives only in memory. Used by tests and demos.
    pub fn in_memory(root: Value) -> Result<Self, StoreError> {
        let (data, _) = prepare(root)?;
        Ok(Self::from_parts(None, data))
    }

    fn from_parts(path: Option<PathBuf>, data: Map<String, Value>) -> Self {
        Self {
            inner: Arc::new(Inner {
                path,
                data: RwLock::new(data),
            }),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    pub async fn resource_names(&self) -> Vec<String> {
        self.inner.data.read().await.keys().cloned().collect()
    }

    /// Reads a whole resource: a filtered page for collections, the object
    /// itself for singular resources.
    pub async fn read(&self, resource: &str, query: &ListQuery) -> Result<Listing, StoreError> {
        let data = self.inner.data.read().await;
        match data.get(resource) {
            Some(Value::Array(records)) => Ok(Listing::Collection(query.apply(records))),
            Some(value) => Ok(Listing::Singular(value.clone())),
            None => Err(StoreError::ResourceNotFound(resource.to_string())),
        }
    }

    pub async fn list(&self, resource: &str, query: &ListQuery) -> Result<Page, StoreError> {
        match self.read(resource, query).await? {
            Listing::Collection(page) => Ok(page),
            Listing::Singular(_) => Err(StoreError::NotACollection(resource.to_string())),
        }
    }

    pub async fn singular(&self, resource: &str) -> Result<Value, StoreError> {
        match self.read(resource, &ListQuery::default()).await? {
            Listing::Singular(value) => Ok(value),
            Listing::Collection(_) => Err(StoreError::NotASingular(resource.to_string())),
        }
    }

    pub async fn find(&self, resource: &str, id: &str) -> Result<Value, StoreError> {
        let data = self.inner.data.read().await;
        records(&data, resource, id)?
            .iter()
            .find(|record| id_matches(record, id))
            .cloned()
            .ok_or_else(|| not_found(resource, id))
    }

    /// First record of `resource` accepted by `predicate`. A missing
    /// resource yields `None`.
    pub(crate) async fn find_where<P>(
        &self,
        resource: &str,
        predicate: P,
    ) -> Result<Option<Value>, StoreError>
    where
        P: Fn(&Value) -> bool,
    {
        let data = self.inner.data.read().await;
        match data.get(resource) {
            Some(Value::Array(records)) => Ok(records.iter().find(|&record| predicate(record)).cloned()),
            Some(_) => Err(StoreError::NotACollection(resource.to_string())),
            None => Ok(None),
        }
    }

    /// Appends a record, assigning an id when the body has none. A missing
    /// resource is created as an empty collection first.
    #[instrument(skip(self, body))]
    pub async fn insert(&self, resource: &str, body: Value) -> Result<Value, StoreError> {
        let mut record = object_body(body)?;
        hash_user_password(resource, &mut record)?;
        let requested = match record.get("id") {
            None | Some(Value::Null) => None,
            Some(id @ (Value::Number(_) | Value::String(_))) => Some(id.clone()),
            Some(_) => {
                return Err(StoreError::InvalidBody(
                    "id must be a number or a string".to_string(),
                ));
            }
        };

        let mut data = self.inner.data.write().await;
        let entry = data
            .entry(resource.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        let Value::Array(records) = entry else {
            return Err(StoreError::NotACollection(resource.to_string()));
        };

        let id = match requested {
            Some(id) => {
                let rendered = render_id(&id);
                if records.iter().any(|r| id_matches(r, &rendered)) {
                    return Err(StoreError::DuplicateId {
                        resource: resource.to_string(),
                        id: rendered,
                    });
                }
                id
            }
            None => next_id(records),
        };

        record.insert("id".to_string(), id);
        let created = Value::Object(record);
        records.push(created.clone());

        self.persist(&data).await?;
        debug!(id = %render_id(&created["id"]), "Record inserted");
        Ok(created)
    }

    /// Replaces a record wholesale. The stored `id` always wins over one in
    /// the body.
    #[instrument(skip(self, body))]
    pub async fn replace(&self, resource: &str, id: &str, body: Value) -> Result<Value, StoreError> {
        let mut replacement = object_body(body)?;
        hash_user_password(resource, &mut replacement)?;
        self.modify(resource, id, |record| {
            let stored_id = record.get("id").cloned().unwrap_or(Value::Null);
            *record = replacement;
            record.insert("id".to_string(), stored_id);
        })
        .await
    }

    /// Shallow-merges `patch` into a record.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, resource: &str, id: &str, patch: Value) -> Result<Value, StoreError> {
        let mut patch = object_body(patch)?;
        hash_user_password(resource, &mut patch)?;
        self.modify(resource, id, |record| merge(record, patch)).await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, resource: &str, id: &str) -> Result<Value, StoreError> {
        let mut data = self.inner.data.write().await;
        let records = records_mut(&mut data, resource, id)?;
        let position = records
            .iter()
            .position(|record| id_matches(record, id))
            .ok_or_else(|| not_found(resource, id))?;
        let removed = records.remove(position);

        self.persist(&data).await?;
        Ok(removed)
    }

    #[instrument(skip(self, body))]
    pub async fn replace_singular(&self, resource: &str, body: Value) -> Result<Value, StoreError> {
        let replacement = object_body(body)?;
        self.modify_singular(resource, |object| *object = replacement)
            .await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_singular(&self, resource: &str, patch: Value) -> Result<Value, StoreError> {
        let patch = object_body(patch)?;
        self.modify_singular(resource, |object| merge(object, patch))
            .await
    }

    async fn modify<F>(&self, resource: &str, id: &str, change: F) -> Result<Value, StoreError>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let mut data = self.inner.data.write().await;
        let record = records_mut(&mut data, resource, id)?
            .iter_mut()
            .find(|record| id_matches(record, id))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| not_found(resource, id))?;

        change(record);
        let updated = Value::Object(record.clone());

        self.persist(&data).await?;
        Ok(updated)
    }

    async fn modify_singular<F>(&self, resource: &str, change: F) -> Result<Value, StoreError>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let mut data = self.inner.data.write().await;
        let object = match data.get_mut(resource) {
            Some(Value::Object(object)) => object,
            Some(_) => return Err(StoreError::NotASingular(resource.to_string())),
            None => return Err(StoreError::ResourceNotFound(resource.to_string())),
        };

        change(object);
        let updated = Value::Object(object.clone());

        self.persist(&data).await?;
        Ok(updated)
    }

    /// Writes the dataset back to its file. The caller keeps holding the
    /// write lock so the file follows the in-memory order of writes.
    async fn persist(&self, data: &Map<String, Value>) -> Result<(), StoreError> {
        match &self.inner.path {
            Some(path) => write_atomically(path, data).await.inspect_err(|err| {
                warn!(error = %err, path = %path.display(), "Failed to persist dataset");
            }),
            None => Ok(()),
        }
    }
}

/// Validates the dataset shape and hashes plaintext passwords in `users`.
/// Returns the root object and the number of passwords hashed.
fn prepare(root: Value) -> Result<(Map<String, Value>, usize), StoreError> {
    let Value::Object(mut data) = root else {
        return Err(StoreError::InvalidDataset(
            "the root must be a JSON object".to_string(),
        ));
    };

    for (name, value) in &data {
        match value {
            Value::Array(records) if records.iter().all(Value::is_object) => {}
            Value::Array(_) => {
                return Err(StoreError::InvalidDataset(format!(
                    "every record in '{name}' must be an object"
                )));
            }
            Value::Object(_) => {}
            _ => {
                return Err(StoreError::InvalidDataset(format!(
                    "'{name}' must be an array or an object"
                )));
            }
        }
    }

    let mut hashed = 0;
    if let Some(Value::Array(users)) = data.get_mut(USERS_RESOURCE) {
        for user in users.iter_mut().filter_map(Value::as_object_mut) {
            if hash_user_password(USERS_RESOURCE, user)? {
                hashed += 1;
            }
        }
    }

    Ok((data, hashed))
}

/// Replaces a plaintext `password` on a `users` record with its bcrypt hash.
/// Returns whether anything was hashed.
fn hash_user_password(resource: &str, record: &mut Map<String, Value>) -> Result<bool, StoreError> {
    if resource != USERS_RESOURCE {
        return Ok(false);
    }
    match record.get_mut("password") {
        Some(Value::String(password)) if !is_password_hash(password) => {
            *password = hash_password(password)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

async fn write_atomically(path: &Path, data: &Map<String, Value>) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(data)?;
    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    debug!(path = %path.display(), "Dataset persisted");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn object_body(body: Value) -> Result<Map<String, Value>, StoreError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::InvalidBody(
            "Request body must be a JSON object".to_string(),
        )),
    }
}

fn merge(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        if key != "id" {
            target.insert(key, value);
        }
    }
}

fn not_found(resource: &str, id: &str) -> StoreError {
    StoreError::RecordNotFound {
        resource: resource.to_string(),
        id: id.to_string(),
    }
}

/// Records of a collection addressed by id. Singular resources have no
/// addressable records, so they report the record as missing.
fn records<'a>(
    data: &'a Map<String, Value>,
    resource: &str,
    id: &str,
) -> Result<&'a Vec<Value>, StoreError> {
    match data.get(resource) {
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(not_found(resource, id)),
        None => Err(StoreError::ResourceNotFound(resource.to_string())),
    }
}

fn records_mut<'a>(
    data: &'a mut Map<String, Value>,
    resource: &str,
    id: &str,
) -> Result<&'a mut Vec<Value>, StoreError> {
    match data.get_mut(resource) {
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(not_found(resource, id)),
        None => Err(StoreError::ResourceNotFound(resource.to_string())),
    }
}

fn render_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn id_matches(record: &Value, id: &str) -> bool {
    match record.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

/// `max(id) + 1` while every id is an integer and the increment fits in an
/// `i64`, otherwise a fresh UUID.
fn next_id(records: &[Value]) -> Value {
    records
        .iter()
        .filter_map(|record| record.get("id"))
        .try_fold(0_i64, |max, id| id.as_i64().map(|id| max.max(id)))
        .and_then(|max| max.checked_add(1))
        .map_or_else(|| Value::String(Uuid::new_v4().to_string()), Value::from)
}
