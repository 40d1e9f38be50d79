use axum::{extract::State, response::IntoResponse, Json};

use crate::{config::Config, http::state::HttpState};

#[utoipa::path(
    get,
    path = "/config",
    responses(
        (status = 200, description = "Successfully retrieved configuration", body = Config),
    ),
    description = "Returns the effective configuration of the oracle server"
)]
#[axum::debug_handler]
pub async fn handle_config(State(state): State<HttpState>) -> impl IntoResponse {
    Json(state.config.as_ref().clone()).into_response()
}
