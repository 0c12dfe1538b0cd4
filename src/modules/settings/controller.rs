use axum::{Json, extract::State};
use tracing::{info, instrument};

use crate::state::AppState;

/// Switch the random response delay on or off
///
/// Responds with the new state.
#[utoipa::path(
    get,
    path = "/toggle-delay",
    responses(
        (status = 200, description = "Whether the delay is now enabled", body = bool)
    ),
    tag = "Settings"
)]
#[instrument(skip(state))]
pub async fn toggle_delay(State(state): State<AppState>) -> Json<bool> {
    let enabled = state.delay.toggle();
    info!(enabled, "Response delay toggled");
    Json(enabled)
}
