//! In-memory collaborators with call counters

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use oracle_types::{FieldId, Protocol};

use crate::{
    apis::{
        AttestationTransport, AttestedPayload, PayloadRequest, PriceFeedContract, SignerDiscovery,
    },
    error::{ConfigError, TransportError},
};

/// Answers per (field, protocol) pair. Anything not configured fails with a contract error
#[derive(Default)]
pub struct StubPriceFeed {
    prices: HashMap<(FieldId, Protocol), U256>,
    multiple: HashMap<Protocol, (U256, U256)>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubPriceFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, field: FieldId, protocol: Protocol, raw: u128) -> Self {
        self.prices.insert((field, protocol), U256::from(raw));
        self
    }

    /// Same price under both protocols
    pub fn with_price_everywhere(self, field: FieldId, raw: u128) -> Self {
        self.with_price(field, Protocol::Modern, raw)
            .with_price(field, Protocol::Legacy, raw)
    }

    pub fn with_multiple(mut self, protocol: Protocol, eth: u128, btc: u128) -> Self {
        self.multiple
            .insert(protocol, (U256::from(eth), U256::from(btc)));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Total contract calls, successful or not
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    async fn single(
        &self,
        field: FieldId,
        payload: &AttestedPayload,
    ) -> Result<U256, TransportError> {
        self.enter().await;
        self.prices
            .get(&(field, payload.protocol))
            .copied()
            .ok_or_else(|| {
                TransportError::Contract(format!("{field} reverted under {}", payload.protocol))
            })
    }
}

#[async_trait]
impl PriceFeedContract for StubPriceFeed {
    async fn get_eth_price(&self, payload: &AttestedPayload) -> Result<U256, TransportError> {
        self.single(FieldId::Eth, payload).await
    }

    async fn get_btc_price(&self, payload: &AttestedPayload) -> Result<U256, TransportError> {
        self.single(FieldId::Btc, payload).await
    }

    async fn get_multiple_prices(
        &self,
        payload: &AttestedPayload,
    ) -> Result<(U256, U256), TransportError> {
        self.enter().await;
        self.multiple.get(&payload.protocol).copied().ok_or_else(|| {
            TransportError::Contract(format!(
                "getMultiplePrices reverted under {}",
                payload.protocol
            ))
        })
    }
}

/// Accepts everything unless told otherwise
#[derive(Default)]
pub struct StubTransport {
    rejected_services: HashSet<String>,
    failing_protocols: HashSet<Protocol>,
    checks: AtomicUsize,
    fetches: AtomicUsize,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construction of any config with this service id fails
    pub fn reject_service(mut self, service_id: impl Into<String>) -> Self {
        self.rejected_services.insert(service_id.into());
        self
    }

    /// Payload fetches for this protocol fail
    pub fn fail_fetches(mut self, protocol: Protocol) -> Self {
        self.failing_protocols.insert(protocol);
        self
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AttestationTransport for StubTransport {
    fn check(&self, request: &PayloadRequest) -> Result<(), ConfigError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        match &request.service_id {
            Some(id) if self.rejected_services.contains(&id.to_string()) => Err(
                ConfigError::Rejected(format!("{id} is not supported by this sdk")),
            ),
            _ => Ok(()),
        }
    }

    async fn fetch_payload(
        &self,
        request: &PayloadRequest,
    ) -> Result<AttestedPayload, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing_protocols.contains(&request.protocol) {
            return Err(TransportError::Payload(format!(
                "{} gateway unreachable",
                request.protocol
            )));
        }
        Ok(AttestedPayload {
            protocol: request.protocol,
            bytes: vec![0u8; 32],
        })
    }
}

#[derive(Default)]
pub struct StubSignerDiscovery {
    signers: BTreeMap<String, Vec<Address>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubSignerDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signers(mut self, service_id: impl Into<String>, signers: Vec<Address>) -> Self {
        self.signers.insert(service_id.into(), signers);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignerDiscovery for StubSignerDiscovery {
    async fn resolve_signers(&self, service_id: &str) -> Result<Vec<Address>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.signers
            .get(service_id)
            .cloned()
            .ok_or_else(|| TransportError::SignerDiscovery(format!("unknown {service_id}")))
    }
}
