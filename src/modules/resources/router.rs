use axum::{Router, middleware, routing::get};

use super::controller::{
    create_record, delete_record, get_record, list_resource, replace_record, replace_singular,
    unknown_route, update_record, update_singular,
};
use crate::middleware::auth::authenticate;
use crate::middleware::role::require_administrator;
use crate::state::AppState;

/// Dataset routes, mounted as the application's fallback.
///
/// The gates are applied with `layer` rather than `route_layer` so unmatched
/// paths and methods are also refused to anonymous and non-administrator
/// callers.
pub fn init_resources_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/{resource}",
            get(list_resource)
                .post(create_record)
                .put(replace_singular)
                .patch(update_singular),
        )
        .route(
            "/{resource}/{id}",
            get(get_record)
                .put(replace_record)
                .patch(update_record)
                .delete(delete_record),
        )
        .fallback(unknown_route)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_administrator,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
}
