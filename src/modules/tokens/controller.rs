use axum::{Json, extract::State};
use tracing::instrument;

use fauxrest_auth::TokenStatus;
use fauxrest_core::AppError;

use super::model::{Credentials, MessageResponse, TokenResponse};
use super::service::TokenService;
use crate::middleware::auth::PresentedToken;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/tokens",
    request_body = Credentials,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Malformed request body", body = MessageResponse),
        (status = 401, description = "Invalid username or password", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    ),
    tag = "Tokens"
)]
#[instrument(skip(state))]
pub async fn create_token(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> Result<Json<TokenResponse>, AppError> {
    let issued = TokenService::create(&state.store, &credentials, &state.jwt_config).await?;

    Ok(Json(TokenResponse {
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiry_secs,
    }))
}

/// Report whether a token is currently honoured
///
/// The token is read from the path, the `Authorization` header or the
/// `token` query parameter.
#[utoipa::path(
    get,
    path = "/tokens/{token}",
    params(("token" = String, Path, description = "Token to check")),
    responses(
        (status = 200, description = "Token status", body = TokenStatus)
    ),
    tag = "Tokens"
)]
#[instrument(skip_all)]
pub async fn check_token(
    State(state): State<AppState>,
    PresentedToken(token): PresentedToken,
) -> Json<TokenStatus> {
    Json(TokenService::check(
        token.as_deref(),
        &state.jwt_config,
        state.revocations.as_ref(),
    ))
}

/// Revoke a token before it expires
#[utoipa::path(
    delete,
    path = "/tokens/{token}",
    params(("token" = String, Path, description = "Token to revoke")),
    responses(
        (status = 200, description = "Token revoked", body = MessageResponse),
        (status = 401, description = "Missing or forged token", body = MessageResponse)
    ),
    tag = "Tokens"
)]
#[instrument(skip_all)]
pub async fn revoke_token(
    State(state): State<AppState>,
    PresentedToken(token): PresentedToken,
) -> Result<Json<MessageResponse>, AppError> {
    TokenService::revoke(
        token.as_deref(),
        &state.jwt_config,
        state.revocations.as_ref(),
    )?;

    Ok(Json(MessageResponse {
        message: "Token revoked.".to_string(),
    }))
}
