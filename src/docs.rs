use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use fauxrest_auth::TokenStatus;
use fauxrest_store::User;

use crate::modules::tokens::model::{Credentials, MessageResponse, TokenResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::tokens::controller::create_token,
        crate::modules::tokens::controller::check_token,
        crate::modules::tokens::controller::revoke_token,
        crate::modules::users::controller::get_current_user,
        crate::modules::settings::controller::toggle_delay,
        crate::modules::resources::controller::list_resource,
        crate::modules::resources::controller::get_record,
        crate::modules::resources::controller::create_record,
        crate::modules::resources::controller::replace_record,
        crate::modules::resources::controller::update_record,
        crate::modules::resources::controller::replace_singular,
        crate::modules::resources::controller::update_singular,
        crate::modules::resources::controller::delete_record,
    ),
    components(
        schemas(
            Credentials,
            TokenResponse,
            TokenStatus,
            MessageResponse,
            User,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Tokens", description = "Issue, check and revoke bearer tokens"),
        (name = "Users", description = "The authenticated user"),
        (name = "Settings", description = "Runtime switches"),
        (name = "Resources", description = "CRUD over the JSON dataset (administrators only)")
    ),
    info(
        title = "fauxrest",
        version = "0.1.0",
        description = "A fake REST API over a JSON dataset, guarded by bearer tokens and an administrator role.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_token_and_resource_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/tokens", "/tokens/{token}", "/users/me", "/toggle-delay", "/{resource}", "/{resource}/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
