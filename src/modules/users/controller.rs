use axum::{Json, extract::State};
use tracing::instrument;

use fauxrest_core::AppError;
use fauxrest_store::User;

use super::service::UserService;
use crate::middleware::auth::AuthUser;
use crate::modules::tokens::model::MessageResponse;
use crate::state::AppState;

/// The user the presented token was issued to
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Current user, without password", body = User),
        (status = 401, description = "Missing, invalid or revoked token", body = MessageResponse),
        (status = 404, description = "The token's user no longer exists", body = MessageResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = UserService::current_user(&state.store, auth_user.slug()).await?;
    Ok(Json(user))
}
