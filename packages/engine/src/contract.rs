use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::{DynProvider, Provider};
use alloy_rpc_types_eth::TransactionRequest;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use oracle_types::IPriceFeed;
use tracing::instrument;

use crate::{
    apis::{AttestedPayload, PriceFeedContract},
    error::TransportError,
};

/// The deployed price-feed contract, read with `eth_call`.
///
/// The attested payload rides at the tail of the calldata, where the on-chain consumer
/// extracts and verifies it.
#[derive(Clone)]
pub struct EvmPriceFeed {
    pub address: Address,
    provider: DynProvider,
}

impl EvmPriceFeed {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self { address, provider }
    }

    #[instrument(level = "trace", skip(self, call, payload), fields(subsys = "EvmPriceFeed", address = %self.address))]
    async fn read<C: SolCall + Send + Sync>(
        &self,
        call: C,
        payload: &AttestedPayload,
    ) -> Result<C::Return, TransportError> {
        let tx = TransactionRequest::default()
            .with_to(self.address)
            .with_input(attach_payload(&call, payload));

        let output = self
            .provider
            .call(tx)
            .await
            .map_err(|e| TransportError::Contract(format!("{}: {e}", C::SIGNATURE)))?;

        C::abi_decode_returns(&output)
            .map_err(|e| TransportError::Contract(format!("{}: decode: {e}", C::SIGNATURE)))
    }
}

fn attach_payload<C: SolCall>(call: &C, payload: &AttestedPayload) -> Bytes {
    let mut data = call.abi_encode();
    data.extend_from_slice(&payload.bytes);
    data.into()
}

#[async_trait]
impl PriceFeedContract for EvmPriceFeed {
    async fn get_eth_price(&self, payload: &AttestedPayload) -> Result<U256, TransportError> {
        self.read(IPriceFeed::getEthPriceCall {}, payload).await
    }

    async fn get_btc_price(&self, payload: &AttestedPayload) -> Result<U256, TransportError> {
        self.read(IPriceFeed::getBtcPriceCall {}, payload).await
    }

    async fn get_multiple_prices(
        &self,
        payload: &AttestedPayload,
    ) -> Result<(U256, U256), TransportError> {
        let prices = self
            .read(IPriceFeed::getMultiplePricesCall {}, payload)
            .await?;
        Ok((prices.ethPrice, prices.btcPrice))
    }
}

impl std::fmt::Debug for EvmPriceFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmPriceFeed")
            .field("address", &self.address)
            .finish()
    }
}
