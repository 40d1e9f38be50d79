use std::{collections::BTreeMap, sync::Arc, time::Duration};

use alloy_primitives::{address, Address};
use anyhow::{Context, Result};
use oracle_engine::{
    EvmPriceFeed, GatewayTransport, LegacyStrategy, PriceEngine, StaticSignerRegistry,
    StrategyList, WrapperBuilder,
};
use oracle_types::{FieldId, StrategyEntry};
use serde::{Deserialize, Serialize};
use url::Url;
use utils::{
    config::ConfigExt,
    evm_client::{EvmEndpoint, EvmQueryClient},
};
use utoipa::ToSchema;

/// The fully parsed and validated config struct we use in the application
/// this is built up from the ConfigBuilder which can load from multiple sources (in order of preference):
///
/// 1. cli args
/// 2. environment variables
/// 3. config file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
#[serde(default)]
pub struct Config {
    /// The port to bind the server to.
    /// Default is `8000`
    pub port: u32,
    /// The log-level to use, in the format of [tracing directives](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives).
    /// Default is `["info"]`
    pub log_level: Vec<String>,
    /// The host to bind the server to
    /// Default is `localhost`
    pub host: String,
    /// The allowed cors origins
    /// Default is empty
    pub cors_allowed_origins: Vec<String>,
    /// Jaeger collector, tracing is only exported when set
    pub jaeger: Option<String>,

    /// Default is the Lisk Sepolia public endpoint
    pub rpc_endpoint: String,
    #[schema(value_type = String)]
    pub feed_contract_address: Address,
    /// Shared by every strategy entry with `with_gateways = true`,
    /// and the transport's fallback when a request names no gateway
    pub gateway_urls: Vec<String>,
    /// Tried in order, the first that constructs serves the request
    pub strategies: Vec<StrategyEntry>,
    pub legacy_service_id: String,
    pub unique_signer_count: u32,
    pub data_feeds: Vec<FieldId>,
    pub call_timeout_ms: u64,
    /// Authorized signers per data service, consulted by the legacy fallback
    #[schema(value_type = Object)]
    pub signers: BTreeMap<String, Vec<Address>>,
}

/// Default values for the config struct
/// these are only used to fill in holes after all the parsing and loading is done
impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            log_level: vec!["info".to_string()],
            host: "localhost".to_string(),
            cors_allowed_origins: Vec::new(),
            jaeger: None,
            rpc_endpoint: "https://rpc.sepolia-api.lisk.com".to_string(),
            feed_contract_address: address!("0C4Cd1093197D4B8Fe3F9284427cEF2DBd741346"),
            gateway_urls: vec![
                "https://oracle-gateway-1.a.redstone.finance".to_string(),
                "https://oracle-gateway-2.a.redstone.finance".to_string(),
                "https://oracle-gateway-3.a.redstone.finance".to_string(),
            ],
            strategies: vec![
                StrategyEntry::new("redstone-main-demo", true),
                StrategyEntry::new("redstone-primary-prod", true),
                StrategyEntry::new("redstone-main-demo", false),
            ],
            legacy_service_id: "redstone-main-demo".to_string(),
            unique_signer_count: 1,
            data_feeds: FieldId::ALL.to_vec(),
            call_timeout_ms: 5000,
            signers: StaticSignerRegistry::known(),
        }
    }
}

impl Config {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn rpc_endpoint(&self) -> Result<EvmEndpoint> {
        self.rpc_endpoint
            .parse()
            .context(format!("invalid rpc endpoint {}", self.rpc_endpoint))
    }

    pub fn strategy_list(&self) -> StrategyList {
        StrategyList::from_entries(
            &self.strategies,
            &self.gateway_urls,
            &self.data_feeds,
            self.unique_signer_count,
        )
    }

    pub fn legacy_strategy(&self) -> LegacyStrategy {
        LegacyStrategy::new(
            self.legacy_service_id.clone(),
            self.data_feeds.clone(),
            self.unique_signer_count,
        )
    }

    /// Parsed default gateways. Malformed entries are a startup error, not a per-request one
    pub fn default_gateways(&self) -> Result<Vec<Url>> {
        self.gateway_urls
            .iter()
            .map(|url| Url::parse(url).context(format!("invalid gateway url {url}")))
            .collect()
    }

    /// Wires the on-chain and gateway collaborators into an engine
    pub async fn price_engine(&self, rpc: &EvmQueryClient) -> Result<PriceEngine> {
        let contract = Arc::new(EvmPriceFeed::new(
            self.feed_contract_address,
            rpc.provider.clone(),
        ));

        let http_client = reqwest::Client::builder()
            .timeout(self.call_timeout())
            .build()
            .context("building gateway http client")?;
        let transport = Arc::new(GatewayTransport::new(
            http_client,
            self.default_gateways()?,
        ));

        let builder =
            WrapperBuilder::new(contract, transport).with_call_timeout(self.call_timeout());

        Ok(PriceEngine::new(
            builder,
            self.strategy_list(),
            self.legacy_strategy(),
            Arc::new(StaticSignerRegistry::new(self.signers.clone())),
        ))
    }
}

impl ConfigExt for Config {
    const FILENAME: &'static str = "oracle.toml";

    fn log_levels(&self) -> impl Iterator<Item = &str> {
        self.log_level.iter().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment() {
        let config = Config::default();

        assert_eq!(config.port, 8000);
        assert_eq!(config.call_timeout(), Duration::from_secs(5));
        assert!(matches!(config.rpc_endpoint().unwrap(), EvmEndpoint::Http(_)));
        assert_eq!(config.default_gateways().unwrap().len(), 3);

        let strategies = config.strategy_list();
        assert_eq!(strategies.len(), 3);
        assert_eq!(strategies.configs()[1].service_id, "redstone-primary-prod");
        assert_eq!(strategies.configs()[2].gateway_urls, None);

        assert_eq!(config.legacy_strategy().service_id, "redstone-main-demo");
        assert_eq!(
            config.signers.get("redstone-main-demo").unwrap(),
            &vec![StaticSignerRegistry::MAIN_DEMO_SIGNER]
        );
    }

    #[test]
    fn bad_gateway_is_a_startup_error() {
        let config = Config {
            gateway_urls: vec!["::".to_string()],
            ..Default::default()
        };
        config.default_gateways().unwrap_err();
    }
}
