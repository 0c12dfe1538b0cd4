use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use fauxrest_config::CorsConfig;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::auth::authenticate;
use crate::middleware::delay::inject_delay;
use crate::middleware::security_headers::with_security_headers;
use crate::modules::resources::controller::X_TOTAL_COUNT;
use crate::modules::resources::router::init_resources_router;
use crate::modules::settings::router::init_settings_router;
use crate::modules::tokens::router::init_tokens_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

fn cors_layer(cors_config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([X_TOTAL_COUNT]);

    if cors_config.allows_any_origin() {
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed_origins: Vec<HeaderValue> = cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    layer
        .allow_origin(allowed_origins)
        .allow_credentials(true)
}

/// Builds the application.
///
/// Requests pass logging, CORS, security headers and the delay injector in
/// that order before reaching a route. Anything not matched by the token,
/// user and settings routes falls through to the dataset router.
pub fn init_router(state: AppState) -> Router {
    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(init_tokens_router())
        .merge(init_settings_router())
        .merge(
            init_users_router()
                .route_layer(middleware::from_fn_with_state(state.clone(), authenticate)),
        )
        .fallback_service(init_resources_router(state.clone()))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state.delay.clone(), inject_delay));

    with_security_headers(app)
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn(logging_middleware))
}
