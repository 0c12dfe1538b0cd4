use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{check_token, create_token, revoke_token};
use crate::state::AppState;

pub fn init_tokens_router() -> Router<AppState> {
    Router::new()
        .route(
            "/tokens",
            post(create_token).get(check_token).delete(revoke_token),
        )
        .route("/tokens/{token}", get(check_token).delete(revoke_token))
}
