use axum::{extract::State, response::IntoResponse, Json};
use oracle_types::HealthResponse;
use tracing::instrument;

use crate::http::state::HttpState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health status", body = HealthResponse),
    ),
    description = "Liveness, the number of configured strategies and the latest block on the rpc endpoint"
)]
#[instrument(level = "debug", skip(state))]
#[axum::debug_handler]
pub async fn handle_health(State(state): State<HttpState>) -> impl IntoResponse {
    let rpc_block_height = match &state.rpc {
        Some(client) => match utils::health::check_evm_block_height(client).await {
            Ok(height) => Some(height),
            Err(err) => {
                tracing::warn!("{}", err);
                None
            }
        },
        None => None,
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        strategies: state.engine.strategies().len(),
        rpc_block_height,
    })
    .into_response()
}
