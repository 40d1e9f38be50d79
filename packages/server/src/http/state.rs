use std::sync::Arc;

use oracle_engine::PriceEngine;
use utils::evm_client::EvmQueryClient;

use crate::config::Config;

#[derive(Clone)]
pub struct HttpState {
    pub config: Arc<Config>,
    pub engine: PriceEngine,
    /// Only used by the health check, absent when the engine runs against stubs
    pub rpc: Option<EvmQueryClient>,
}

impl HttpState {
    pub fn new(config: Arc<Config>, engine: PriceEngine, rpc: Option<EvmQueryClient>) -> Self {
        Self {
            config,
            engine,
            rpc,
        }
    }

    /// Connects to the configured chain and wires the real collaborators
    pub async fn connect(config: Arc<Config>) -> anyhow::Result<Self> {
        let rpc = EvmQueryClient::new(config.rpc_endpoint()?).await?;
        let engine = config.price_engine(&rpc).await?;

        Ok(Self::new(config, engine, Some(rpc)))
    }
}
