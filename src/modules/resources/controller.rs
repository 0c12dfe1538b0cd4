//! Generic CRUD handlers over the dataset.
//!
//! `{resource}` names a top-level key of the dataset. Arrays are collections
//! addressed as `/{resource}/{id}`; objects are singular resources read and
//! written at `/{resource}`.

use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::instrument;

use fauxrest_core::AppError;
use fauxrest_store::Listing;

use super::service::ResourceService;
use crate::modules::tokens::model::MessageResponse;
use crate::state::AppState;

/// Number of records matching the filters before paging.
pub const X_TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::bad_request(anyhow!(rejection.body_text())))
}

/// List a collection or read a singular resource
///
/// Collections accept json-server query parameters: `field=value`,
/// `field_ne`, `field_like`, `field_gte`, `field_lte`, `q`, `_sort`, `_order`,
/// `_start`, `_end`, `_limit` and `_page`.
#[utoipa::path(
    get,
    path = "/{resource}",
    params(("resource" = String, Path, description = "Dataset key")),
    responses(
        (status = 200, description = "Matching records, or the singular object",
            headers(("x-total-count" = usize, description = "Matches before paging"))),
        (status = 401, description = "Authentication required", body = MessageResponse),
        (status = 403, description = "Administrator role required", body = MessageResponse),
        (status = 404, description = "Unknown resource", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn list_resource(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let response = match ResourceService::read(&state.store, &resource, params).await? {
        Listing::Collection(page) => {
            ([(X_TOTAL_COUNT, page.total.to_string())], Json(page.items)).into_response()
        }
        Listing::Singular(value) => Json(value).into_response(),
    };
    Ok(response)
}

/// Read one record of a collection
#[utoipa::path(
    get,
    path = "/{resource}/{id}",
    params(
        ("resource" = String, Path, description = "Dataset key"),
        ("id" = String, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "The record"),
        (status = 404, description = "Unknown resource or record", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn get_record(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(ResourceService::find(&state.store, &resource, &id).await?))
}

/// Add a record to a collection
///
/// A missing `id` is assigned. Posting to an unknown resource creates it.
#[utoipa::path(
    post,
    path = "/{resource}",
    params(("resource" = String, Path, description = "Dataset key")),
    responses(
        (status = 201, description = "The stored record, including its id"),
        (status = 400, description = "Body is not a JSON object", body = MessageResponse),
        (status = 405, description = "Resource is singular", body = MessageResponse),
        (status = 409, description = "Id already taken", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state, body))]
pub async fn create_record(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let created = ResourceService::create(&state.store, &resource, json_body(body)?).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a record
#[utoipa::path(
    put,
    path = "/{resource}/{id}",
    params(
        ("resource" = String, Path, description = "Dataset key"),
        ("id" = String, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "The replaced record"),
        (status = 400, description = "Body is not a JSON object", body = MessageResponse),
        (status = 404, description = "Unknown resource or record", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state, body))]
pub async fn replace_record(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let replaced =
        ResourceService::replace(&state.store, &resource, Some(id.as_str()), json_body(body)?).await?;
    Ok(Json(replaced))
}

/// Merge fields into a record
#[utoipa::path(
    patch,
    path = "/{resource}/{id}",
    params(
        ("resource" = String, Path, description = "Dataset key"),
        ("id" = String, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "The updated record"),
        (status = 400, description = "Body is not a JSON object", body = MessageResponse),
        (status = 404, description = "Unknown resource or record", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state, body))]
pub async fn update_record(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let updated =
        ResourceService::update(&state.store, &resource, Some(id.as_str()), json_body(body)?).await?;
    Ok(Json(updated))
}

/// Replace a singular resource
#[utoipa::path(
    put,
    path = "/{resource}",
    params(("resource" = String, Path, description = "Dataset key")),
    responses(
        (status = 200, description = "The new object"),
        (status = 405, description = "Resource is a collection", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state, body))]
pub async fn replace_singular(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let replaced = ResourceService::replace(&state.store, &resource, None, json_body(body)?).await?;
    Ok(Json(replaced))
}

/// Merge fields into a singular resource
#[utoipa::path(
    patch,
    path = "/{resource}",
    params(("resource" = String, Path, description = "Dataset key")),
    responses(
        (status = 200, description = "The updated object"),
        (status = 405, description = "Resource is a collection", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state, body))]
pub async fn update_singular(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let updated = ResourceService::update(&state.store, &resource, None, json_body(body)?).await?;
    Ok(Json(updated))
}

/// Delete a record
#[utoipa::path(
    delete,
    path = "/{resource}/{id}",
    params(
        ("resource" = String, Path, description = "Dataset key"),
        ("id" = String, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Deleted; the body is an empty object"),
        (status = 404, description = "Unknown resource or record", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn delete_record(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    ResourceService::delete(&state.store, &resource, &id).await?;
    Ok(Json(json!({})))
}

pub async fn unknown_route() -> AppError {
    AppError::not_found(anyhow!("Not found"))
}
