use axum::{
    extract::{FromRequestParts, Query, RawPathParams, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use serde::Deserialize;
use std::convert::Infallible;
use tracing::warn;

use fauxrest_auth::{AuthError, Claims, authenticate_token};
use fauxrest_core::AppError;

use crate::state::AppState;

/// Identity attached to the request by [`authenticate`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn slug(&self) -> &str {
        self.0.slug()
    }
}

/// Rejects with 401 when no verified token was presented.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AuthError::MissingToken.into())
    }
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// The raw token a client presented, if any, looked up in order:
/// `{token}` path parameter, `Authorization: Bearer` header, `?token=` query.
#[derive(Debug, Clone, Default)]
pub struct PresentedToken(pub Option<String>);

impl<S> FromRequestParts<S> for PresentedToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Ok(params) = RawPathParams::from_request_parts(parts, state).await {
            if let Some((_, token)) = params.iter().find(|(name, _)| *name == "token") {
                return Ok(Self(Some(token.to_string())));
            }
        }

        if let Some(Authorization(bearer)) = parts.headers.typed_get::<Authorization<Bearer>>() {
            return Ok(Self(Some(bearer.token().to_string())));
        }

        let from_query = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(query)| query.token);
        Ok(Self(from_query))
    }
}

/// Verifies a presented token and attaches [`AuthUser`] to the request.
///
/// Requests without a token pass through unauthenticated; later gates and
/// the [`AuthUser`] extractor decide whether that is acceptable. A token
/// that fails verification or has been revoked is rejected with 401.
pub async fn authenticate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let Ok(PresentedToken(token)) = PresentedToken::from_request_parts(&mut parts, &state).await;

    if let Some(token) = token {
        let claims = authenticate_token(&token, &state.jwt_config, state.revocations.as_ref())
            .inspect_err(|err| {
                warn!(path = %parts.uri.path(), reason = %err, "Rejected bearer token");
            })?;
        parts.extensions.insert(AuthUser(claims));
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}
