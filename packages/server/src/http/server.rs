use axum::routing::get;
use axum_tracing_opentelemetry::middleware::OtelAxumLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utils::context::AppContext;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use wildmatch::WildMatch;

use super::{
    handlers::{
        handle_config, handle_health, handle_multiple_prices, handle_not_found, handle_prices,
        openapi::ApiDoc,
    },
    state::HttpState,
};
use crate::config::Config;

// this is called from main
pub fn start(ctx: AppContext, state: HttpState) -> anyhow::Result<()> {
    // The server runs within the tokio runtime
    ctx.rt.clone().block_on(async move {
        let (host, port) = (state.config.host.clone(), state.config.port);

        let mut shutdown_signal = ctx.get_kill_receiver();

        let router = make_router(state);

        let listener = tokio::net::TcpListener::bind(&format!("{}:{}", host, port)).await?;

        tracing::info!("Http server starting on: {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_signal.recv().await.ok();

                tracing::debug!("Http server shutting down");
            })
            .await?;

        anyhow::Ok(())
    })?;

    Ok(())
}

// this is called from main and tests
pub fn make_router(state: HttpState) -> axum::Router {
    let cors = cors_layer(&state.config);

    let mut router = axum::Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/prices", get(handle_prices))
        .route("/prices/multiple", get(handle_multiple_prices))
        .route("/health", get(handle_health))
        .route("/config", get(handle_config))
        .fallback(handle_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(OtelAxumLayer::default())
        .with_state(state);

    if let Some(cors) = cors {
        router = router.layer(cors);
    }

    router
}

fn cors_layer(config: &Config) -> Option<CorsLayer> {
    if config.cors_allowed_origins.is_empty() {
        None
    } else {
        let allowed_origins: Vec<WildMatch> = config
            .cors_allowed_origins
            .iter()
            .map(|s| WildMatch::new(s))
            .collect();

        Some(
            CorsLayer::new()
                // a predicate, so wildcard patterns like https://*.example.com work
                .allow_origin(tower_http::cors::AllowOrigin::predicate(
                    move |origin, _parts| {
                        origin
                            .to_str()
                            .map(|origin| {
                                allowed_origins
                                    .iter()
                                    .any(|allowed_origin| allowed_origin.matches(origin))
                            })
                            .unwrap_or(false)
                    },
                ))
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
    }
}
