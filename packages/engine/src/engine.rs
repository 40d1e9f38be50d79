use std::sync::Arc;

use oracle_types::FieldId;
use tracing::instrument;

use crate::{
    apis::SignerDiscovery,
    normalize::{normalize, RetrievalResult},
    orchestrator::Orchestrator,
    strategy::{LegacyStrategy, StrategyList},
    wrapper::WrapperBuilder,
};

/// Process-wide entry point, built once at startup and shared read-only between requests.
///
/// Every call builds its own wrappers, nothing carries over from one request to the next.
#[derive(Clone)]
pub struct PriceEngine {
    builder: WrapperBuilder,
    strategies: Arc<StrategyList>,
    legacy: Arc<LegacyStrategy>,
    discovery: Arc<dyn SignerDiscovery>,
}

impl PriceEngine {
    pub fn new(
        builder: WrapperBuilder,
        strategies: StrategyList,
        legacy: LegacyStrategy,
        discovery: Arc<dyn SignerDiscovery>,
    ) -> Self {
        Self {
            builder,
            strategies: Arc::new(strategies),
            legacy: Arc::new(legacy),
            discovery,
        }
    }

    pub fn strategies(&self) -> &StrategyList {
        &self.strategies
    }

    pub fn legacy(&self) -> &LegacyStrategy {
        &self.legacy
    }

    /// Reads each field through its own accessor
    #[instrument(level = "debug", skip(self), fields(subsys = "PriceEngine"))]
    pub async fn fetch_prices(&self, fields: &[FieldId]) -> RetrievalResult {
        let primary = match self.strategies.select_primary(&self.builder) {
            Ok(primary) => primary,
            Err(err) => return RetrievalResult::failed(err),
        };

        let result = self.orchestrator().retrieve(&primary, fields).await;
        self.log_result(&result);
        result
    }

    /// Reads both fields with a single tuple call
    #[instrument(level = "debug", skip(self), fields(subsys = "PriceEngine"))]
    pub async fn fetch_multiple(&self) -> RetrievalResult {
        let primary = match self.strategies.select_primary(&self.builder) {
            Ok(primary) => primary,
            Err(err) => return RetrievalResult::failed(err),
        };

        let outcomes = self.orchestrator().retrieve_multiple(&primary).await;
        let result = normalize(&outcomes);
        self.log_result(&result);
        result
    }

    fn orchestrator(&self) -> Orchestrator<'_> {
        Orchestrator::new(&self.builder, &self.legacy, self.discovery.as_ref())
    }

    fn log_result(&self, result: &RetrievalResult) {
        match &result.error {
            Some(err) => tracing::error!("{}", err),
            None => tracing::debug!("Retrieved {} field(s)", result.prices.len()),
        }
    }
}
