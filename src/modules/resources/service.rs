use serde_json::Value;
use tracing::{debug, instrument};

use fauxrest_core::AppError;
use fauxrest_store::{JsonStore, ListQuery, Listing};

/// Query parameter carrying a token; never treated as a filter.
const TOKEN_PARAM: &str = "token";

pub struct ResourceService;

impl ResourceService {
    #[instrument(skip(store))]
    pub async fn read(
        store: &JsonStore,
        resource: &str,
        params: Vec<(String, String)>,
    ) -> Result<Listing, AppError> {
        let query = ListQuery::from_pairs(params.into_iter().filter(|(key, _)| key != TOKEN_PARAM));
        let listing = store.read(resource, &query).await?;

        if let Listing::Collection(page) = &listing {
            debug!(total = page.total, returned = page.items.len(), "Listed collection");
        }
        Ok(listing)
    }

    #[instrument(skip(store))]
    pub async fn find(store: &JsonStore, resource: &str, id: &str) -> Result<Value, AppError> {
        Ok(store.find(resource, id).await?)
    }

    #[instrument(skip(store, body))]
    pub async fn create(store: &JsonStore, resource: &str, body: Value) -> Result<Value, AppError> {
        Ok(store.insert(resource, body).await?)
    }

    #[instrument(skip(store, body))]
    pub async fn replace(
        store: &JsonStore,
        resource: &str,
        id: Option<&str>,
        body: Value,
    ) -> Result<Value, AppError> {
        let replaced = match id {
            Some(id) => store.replace(resource, id, body).await?,
            None => store.replace_singular(resource, body).await?,
        };
        Ok(replaced)
    }

    #[instrument(skip(store, patch))]
    pub async fn update(
        store: &JsonStore,
        resource: &str,
        id: Option<&str>,
        patch: Value,
    ) -> Result<Value, AppError> {
        let updated = match id {
            Some(id) => store.update(resource, id, patch).await?,
            None => store.update_singular(resource, patch).await?,
        };
        Ok(updated)
    }

    #[instrument(skip(store))]
    pub async fn delete(store: &JsonStore, resource: &str, id: &str) -> Result<(), AppError> {
        store.remove(resource, id).await?;
        Ok(())
    }
}
