use axum::{extract::State, response::IntoResponse, Json};
use oracle_types::{ErrorResponse, PricesResponse};
use tracing::instrument;

use crate::http::{error::HttpResult, state::HttpState};

#[utoipa::path(
    get,
    path = "/prices",
    responses(
        (status = 200, description = "Prices that could be retrieved, null for any field that could not", body = PricesResponse),
        (status = 500, description = "No wrapper could be constructed, or every field failed", body = ErrorResponse)
    ),
    description = "Reads each configured price field through its own contract accessor"
)]
#[instrument(level = "debug", skip(state))]
#[axum::debug_handler]
pub async fn handle_prices(State(state): State<HttpState>) -> impl IntoResponse {
    match inner_handle_prices(state).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn inner_handle_prices(state: HttpState) -> HttpResult<PricesResponse> {
    let result = state.engine.fetch_prices(&state.config.data_feeds).await;
    Ok(result.into_prices()?)
}

#[utoipa::path(
    get,
    path = "/prices/multiple",
    responses(
        (status = 200, description = "Both prices from a single tuple read", body = PricesResponse),
        (status = 500, description = "No wrapper could be constructed, or the read failed", body = ErrorResponse)
    ),
    description = "Reads all prices through the contract's combined accessor"
)]
#[instrument(level = "debug", skip(state))]
#[axum::debug_handler]
pub async fn handle_multiple_prices(State(state): State<HttpState>) -> impl IntoResponse {
    match inner_handle_multiple_prices(state).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn inner_handle_multiple_prices(state: HttpState) -> HttpResult<PricesResponse> {
    Ok(state.engine.fetch_multiple().await.into_prices()?)
}
