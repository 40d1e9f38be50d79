use oracle_types::{FeedConfig, FieldId, StrategyEntry};
use tracing::instrument;

use crate::{
    apis::SignerDiscovery,
    error::{FallbackError, RetrievalError, StrategyFailure, TransportError},
    wrapper::{Wrapper, WrapperBuilder},
};

/// Ordered, immutable list of configurations tried when constructing the primary wrapper
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategyList {
    configs: Vec<FeedConfig>,
}

impl StrategyList {
    pub fn new(configs: Vec<FeedConfig>) -> Self {
        Self { configs }
    }

    /// Expands the static entries against the shared gateway and feed settings.
    /// Entries keep their declared order.
    pub fn from_entries(
        entries: &[StrategyEntry],
        gateway_urls: &[String],
        data_feed_ids: &[FieldId],
        unique_signer_count: u32,
    ) -> Self {
        let configs = entries
            .iter()
            .map(|entry| {
                let config = FeedConfig::modern(
                    entry.service_id.clone(),
                    unique_signer_count,
                    data_feed_ids.to_vec(),
                );
                if entry.with_gateways {
                    config.with_gateways(gateway_urls.to_vec())
                } else {
                    config
                }
            })
            .collect();

        Self { configs }
    }

    pub fn configs(&self) -> &[FeedConfig] {
        &self.configs
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// The first entry that constructs wins, later entries are never looked at
    #[instrument(level = "debug", skip(self, builder), fields(subsys = "StrategyList"))]
    pub fn select_primary(&self, builder: &WrapperBuilder) -> Result<Wrapper, RetrievalError> {
        let mut failures = Vec::new();

        for config in &self.configs {
            match builder.build(config) {
                Ok(wrapper) => {
                    tracing::debug!("Primary wrapper: {}", config);
                    return Ok(wrapper);
                }
                Err(error) => {
                    tracing::warn!("Strategy [{}] did not construct: {}", config, error);
                    failures.push(StrategyFailure {
                        strategy: config.to_string(),
                        error,
                    });
                }
            }
        }

        tracing::error!("No strategy out of {} constructed", self.configs.len());
        Err(RetrievalError::NoWrapperAvailable(failures))
    }
}

/// The legacy signer-list configuration.
///
/// Not part of the static list since its signers come from a lookup at call time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyStrategy {
    /// Data service whose signers are resolved. Empty omits the id from the request
    pub service_id: String,
    pub data_feed_ids: Vec<FieldId>,
    pub unique_signer_count: u32,
}

impl LegacyStrategy {
    pub fn new(
        service_id: impl Into<String>,
        data_feed_ids: Vec<FieldId>,
        unique_signer_count: u32,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            data_feed_ids,
            unique_signer_count,
        }
    }

    /// Resolves the signer set and builds a fresh legacy wrapper
    pub async fn build(
        &self,
        builder: &WrapperBuilder,
        discovery: &dyn SignerDiscovery,
    ) -> Result<Wrapper, FallbackError> {
        // discovery may be a network lookup, so it gets the same bound as a call
        let timeout = builder.call_timeout();
        let signers = tokio::time::timeout(timeout, discovery.resolve_signers(&self.service_id))
            .await
            .map_err(|_| TransportError::Timeout(timeout))
            .and_then(|signers| signers)
            .map_err(FallbackError::SignerDiscovery)?;

        let config = FeedConfig::legacy(
            self.service_id.clone(),
            self.unique_signer_count,
            self.data_feed_ids.clone(),
            signers,
        );

        builder.build(&config).map_err(FallbackError::Build)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use oracle_types::Protocol;

    use super::*;
    use crate::{
        error::ConfigError,
        test_utils::{StubPriceFeed, StubSignerDiscovery, StubTransport},
    };

    fn default_entries() -> Vec<StrategyEntry> {
        vec![
            StrategyEntry::new("redstone-main-demo", true),
            StrategyEntry::new("redstone-primary-prod", true),
            StrategyEntry::new("redstone-main-demo", false),
        ]
    }

    fn builder(transport: StubTransport) -> WrapperBuilder {
        WrapperBuilder::new(Arc::new(StubPriceFeed::new()), Arc::new(transport))
    }

    #[test]
    fn entries_expand_in_order() {
        let list = StrategyList::from_entries(
            &default_entries(),
            &["https://gw-1.example".to_string()],
            &FieldId::ALL,
            1,
        );

        assert_eq!(list.len(), 3);
        let configs = list.configs();
        assert_eq!(configs[0].service_id, "redstone-main-demo");
        assert_eq!(configs[0].gateway_urls.as_ref().map(Vec::len), Some(1));
        assert_eq!(configs[1].service_id, "redstone-primary-prod");
        assert_eq!(configs[2].gateway_urls, None);
    }

    #[test]
    fn first_constructible_entry_wins() {
        let list = StrategyList::from_entries(
            &default_entries(),
            &["not a url".to_string()],
            &FieldId::ALL,
            1,
        );

        // both gateway entries fail on the url, the third would be tried next
        let wrapper = list.select_primary(&builder(StubTransport::new())).unwrap();
        assert_eq!(wrapper.config().service_id, "redstone-main-demo");
        assert_eq!(wrapper.config().gateway_urls, None);

        // a later constructible entry is never preferred over an earlier one
        let list = StrategyList::from_entries(&default_entries(), &[], &FieldId::ALL, 1);
        let wrapper = list.select_primary(&builder(StubTransport::new())).unwrap();
        assert_eq!(wrapper.config(), &list.configs()[0]);
    }

    #[test]
    fn none_constructible_collects_every_failure() {
        let transport = StubTransport::new()
            .reject_service("redstone-main-demo")
            .reject_service("redstone-primary-prod");
        let list = StrategyList::from_entries(&default_entries(), &[], &FieldId::ALL, 1);

        match list.select_primary(&builder(transport)).unwrap_err() {
            RetrievalError::NoWrapperAvailable(failures) => {
                assert_eq!(failures.len(), 3);
                assert!(failures
                    .iter()
                    .all(|f| matches!(f.error, ConfigError::Rejected(_))));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn legacy_build_uses_discovered_signers() {
        let discovery = StubSignerDiscovery::new()
            .with_signers("redstone-main-demo", vec![alloy_primitives::Address::ZERO]);
        let legacy = LegacyStrategy::new("redstone-main-demo", FieldId::ALL.to_vec(), 1);

        let wrapper = legacy
            .build(&builder(StubTransport::new()), &discovery)
            .await
            .unwrap();
        assert_eq!(wrapper.protocol(), Protocol::Legacy);
        assert_eq!(wrapper.request().authorized_signers.len(), 1);
        assert_eq!(discovery.calls(), 1);

        let unknown = LegacyStrategy::new("redstone-avalanche", FieldId::ALL.to_vec(), 1);
        assert!(matches!(
            unknown
                .build(&builder(StubTransport::new()), &discovery)
                .await
                .unwrap_err(),
            FallbackError::SignerDiscovery(_)
        ));
    }

    #[tokio::test]
    async fn slow_signer_discovery_times_out() {
        let discovery = StubSignerDiscovery::new()
            .with_signers("redstone-main-demo", vec![alloy_primitives::Address::ZERO])
            .with_delay(Duration::from_millis(200));
        let builder = builder(StubTransport::new()).with_call_timeout(Duration::from_millis(10));
        let legacy = LegacyStrategy::new("redstone-main-demo", FieldId::ALL.to_vec(), 1);

        assert_eq!(
            legacy.build(&builder, &discovery).await.unwrap_err(),
            FallbackError::SignerDiscovery(TransportError::Timeout(Duration::from_millis(10)))
        );
        assert_eq!(discovery.calls(), 1);
    }
}
