use axum::{Router, routing::get};

use super::controller::get_current_user;
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new().route("/users/me", get(get_current_user))
}
