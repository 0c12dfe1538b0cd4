use axum::{Router, routing::get};

use super::controller::toggle_delay;
use crate::state::AppState;

pub fn init_settings_router() -> Router<AppState> {
    Router::new().route("/toggle-delay", get(toggle_delay))
}
