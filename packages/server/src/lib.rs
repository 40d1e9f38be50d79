#![allow(clippy::uninlined_format_args)]

pub mod args;
pub mod config;
pub mod http;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use std::sync::Arc;

use anyhow::Context;
use utils::context::AppContext;

/// Entry point to start up the server
/// Called from main
pub fn run_server(ctx: AppContext, config: config::Config) -> anyhow::Result<()> {
    ctrlc::set_handler({
        let ctx = ctx.clone();
        move || {
            ctx.kill();
        }
    })
    .context("installing ctrl-c handler")?;

    let config = Arc::new(config);
    let state = ctx
        .rt
        .block_on(http::state::HttpState::connect(config))
        .context("connecting to the price feed")?;

    tracing::info!(
        "Serving {} strategies against {}",
        state.engine.strategies().len(),
        state.config.feed_contract_address
    );

    http::server::start(ctx, state)
}
