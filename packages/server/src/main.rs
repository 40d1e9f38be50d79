use anyhow::Context;
use clap::Parser;
use oracle_server::{args::CliArgs, config::Config, run_server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utils::{
    config::{ConfigBuilder, ConfigExt},
    context::AppContext,
    telemetry::setup_tracing,
};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config: Config = ConfigBuilder::new(args).build()?;

    let ctx = AppContext::new().context("starting tokio runtime")?;

    // setup tracing
    let filters = config.tracing_env_filter()?;
    let tracer_provider = match config.jaeger.as_ref() {
        Some(collector) => Some(
            ctx.rt
                .block_on(async { setup_tracing(collector, "oracle-server", filters) })?,
        ),
        None => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .without_time()
                        .with_target(false),
                )
                .with(filters)
                .try_init()?;
            None
        }
    };

    let result = run_server(ctx, config);

    if let Some(tracer) = tracer_provider {
        tracer
            .shutdown()
            .context("TracerProvider should shutdown successfully")?;
    }

    result
}
