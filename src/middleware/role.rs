//! Role gate for routes behind [`authenticate`](crate::middleware::auth::authenticate).
//!
//! Tokens only carry the user's slug, so roles are read from the dataset on
//! every request. A role removed from a user takes effect immediately, even
//! for tokens issued before the change.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use fauxrest_core::{AppError, roles::ADMINISTRATOR};
use fauxrest_store::{User, UserLookup};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Loads the authenticated user and checks that they hold `role`.
///
/// Lookup failures propagate unchanged.
pub async fn authorize_role<L>(users: &L, auth_user: &AuthUser, role: &str) -> Result<User, AppError>
where
    L: UserLookup,
{
    let user = users.find_by_slug(auth_user.slug()).await?;

    if !user.has_role(role) {
        warn!(user = %user.slug, required_role = %role, "Access denied");
        return Err(AppError::forbidden(format!("Requires {role}.")));
    }

    Ok(user)
}

/// Middleware requiring an authenticated user holding `role`.
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/reports", get(reports))
///     .layer(middleware::from_fn_with_state(state.clone(), |state, req, next| {
///         require_role(state, req, next, "auditor")
///     }));
/// ```
pub async fn require_role(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    role: &'static str,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    authorize_role(&state.store, &auth_user, role).await?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

pub async fn require_administrator(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_role(State(state), req, next, ADMINISTRATOR).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
