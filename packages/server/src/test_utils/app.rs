use std::{path::PathBuf, sync::Arc};

use oracle_engine::{
    test_utils::{StubPriceFeed, StubSignerDiscovery, StubTransport},
    PriceEngine, WrapperBuilder,
};
use utils::config::ConfigBuilder;

use crate::{args::CliArgs, config::Config, http::state::HttpState};

/// A config loaded through the real builder, plus an engine wired to in-memory collaborators
#[derive(Clone)]
pub struct TestApp {
    pub config: Arc<Config>,
    pub feed: Arc<StubPriceFeed>,
    pub transport: Arc<StubTransport>,
    pub discovery: Arc<StubSignerDiscovery>,
}

impl TestApp {
    pub fn zeroed_cli_args() -> CliArgs {
        CliArgs {
            home: Some(tempfile::tempdir().unwrap().path().to_path_buf()),
            // purposefully points at a non-existing file
            // so that we don't load a real .env in tests
            dotenv: Some(
                PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                    .join("tests")
                    .join("non-existant-file"),
            ),
            ..Default::default()
        }
    }

    pub fn new() -> Self {
        Self::new_with_args(Self::zeroed_cli_args())
    }

    pub fn new_with_args(cli_args: CliArgs) -> Self {
        Self::new_with_stubs(cli_args, StubPriceFeed::new(), StubTransport::new())
    }

    pub fn new_with_stubs(
        cli_args: CliArgs,
        feed: StubPriceFeed,
        transport: StubTransport,
    ) -> Self {
        utils::init_tracing_tests();

        let config: Config = ConfigBuilder::new(cli_args).build().unwrap();

        let discovery = config
            .signers
            .iter()
            .fold(StubSignerDiscovery::new(), |discovery, (service_id, signers)| {
                discovery.with_signers(service_id.clone(), signers.clone())
            });

        Self {
            config: Arc::new(config),
            feed: Arc::new(feed),
            transport: Arc::new(transport),
            discovery: Arc::new(discovery),
        }
    }

    pub fn engine(&self) -> PriceEngine {
        let builder = WrapperBuilder::new(self.feed.clone(), self.transport.clone())
            .with_call_timeout(self.config.call_timeout());

        PriceEngine::new(
            builder,
            self.config.strategy_list(),
            self.config.legacy_strategy(),
            self.discovery.clone(),
        )
    }

    pub fn http_state(&self) -> HttpState {
        HttpState::new(self.config.clone(), self.engine(), None)
    }

    pub fn http_router(&self) -> axum::Router {
        crate::http::server::make_router(self.http_state())
    }
}
