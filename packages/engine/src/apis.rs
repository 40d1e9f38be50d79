//! The seams between the engine and the outside world.
//!
//! Everything here is consumed through `Arc<dyn _>`, which is what lets every
//! collaborator be swapped for a stub in tests.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use oracle_types::{DataServiceId, FieldId, Protocol};
use url::Url;

use crate::error::{ConfigError, TransportError};

/// The fully validated shape of a signed-payload request, produced by the wrapper builder
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayloadRequest {
    /// `None` only for a legacy request that omits the data-service id
    pub service_id: Option<DataServiceId>,
    pub unique_signer_count: u32,
    pub data_feed_ids: Vec<FieldId>,
    /// Empty means "let the transport use its default gateways"
    pub gateway_urls: Vec<Url>,
    /// Empty for modern requests, where the signers are implied by the service id
    pub authorized_signers: Vec<Address>,
    pub protocol: Protocol,
}

/// A signed data bundle ready to be appended to a contract call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttestedPayload {
    pub protocol: Protocol,
    pub bytes: Vec<u8>,
}

/// Read-only binding to the deployed price-feed contract
#[async_trait]
pub trait PriceFeedContract: Send + Sync {
    async fn get_eth_price(&self, payload: &AttestedPayload) -> Result<U256, TransportError>;

    async fn get_btc_price(&self, payload: &AttestedPayload) -> Result<U256, TransportError>;

    async fn get_multiple_prices(
        &self,
        payload: &AttestedPayload,
    ) -> Result<(U256, U256), TransportError>;

    async fn get_price(
        &self,
        field: FieldId,
        payload: &AttestedPayload,
    ) -> Result<U256, TransportError> {
        match field {
            FieldId::Eth => self.get_eth_price(payload).await,
            FieldId::Btc => self.get_btc_price(payload).await,
        }
    }
}

/// Fetches signed payloads from the oracle gateways
#[async_trait]
pub trait AttestationTransport: Send + Sync {
    /// Construction-time shape check, must not touch the network
    fn check(&self, _request: &PayloadRequest) -> Result<(), ConfigError> {
        Ok(())
    }

    async fn fetch_payload(
        &self,
        request: &PayloadRequest,
    ) -> Result<AttestedPayload, TransportError>;
}

/// Resolves the authorized signer set of a data service, only needed by the legacy protocol
#[async_trait]
pub trait SignerDiscovery: Send + Sync {
    async fn resolve_signers(&self, service_id: &str) -> Result<Vec<Address>, TransportError>;
}
