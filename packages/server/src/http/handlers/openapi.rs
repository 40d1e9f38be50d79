use super::*;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        prices::handle_prices,
        prices::handle_multiple_prices,
        health::handle_health,
        config::handle_config,
    ),
    info(
        title = "Attested Oracle API",
        description = "Read-only access to attested on-chain prices"
    )
)]
pub struct ApiDoc;
