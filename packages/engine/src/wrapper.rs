use std::{future::Future, sync::Arc, time::Duration};

use alloy_primitives::U256;
use oracle_types::{DataServiceId, FeedConfig, FieldId, Protocol};
use tracing::instrument;
use url::Url;

use crate::{
    apis::{AttestationTransport, PayloadRequest, PriceFeedContract},
    error::{ConfigError, TransportError},
};

/// Turns a [`FeedConfig`] into a [`Wrapper`] bound to one contract handle.
///
/// Construction is pure: nothing is fetched until a wrapper is called.
#[derive(Clone)]
pub struct WrapperBuilder {
    contract: Arc<dyn PriceFeedContract>,
    transport: Arc<dyn AttestationTransport>,
    call_timeout: Duration,
}

impl WrapperBuilder {
    pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(
        contract: Arc<dyn PriceFeedContract>,
        transport: Arc<dyn AttestationTransport>,
    ) -> Self {
        Self {
            contract,
            transport,
            call_timeout: Self::DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    #[instrument(level = "trace", skip(self, config), fields(subsys = "WrapperBuilder", config = %config))]
    pub fn build(&self, config: &FeedConfig) -> Result<Wrapper, ConfigError> {
        let protocol = config.protocol();

        let service_id = match (protocol, config.service_id.is_empty()) {
            (Protocol::Legacy, true) => None,
            _ => Some(
                DataServiceId::new(config.service_id.as_str())
                    .map_err(|e| ConfigError::ServiceId(config.service_id.clone(), e.to_string()))?,
            ),
        };

        if config.unique_signer_count < 1 {
            return Err(ConfigError::SignerCount);
        }

        if config.data_feed_ids.is_empty() {
            return Err(ConfigError::NoDataFeeds);
        }

        let gateway_urls = config
            .gateway_urls
            .iter()
            .flatten()
            .map(|url| {
                Url::parse(url).map_err(|e| ConfigError::GatewayUrl(url.clone(), e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let authorized_signers = config.explicit_signers.clone().unwrap_or_default();
        if protocol == Protocol::Legacy && authorized_signers.is_empty() {
            return Err(ConfigError::NoAuthorizedSigners);
        }

        let request = PayloadRequest {
            service_id,
            unique_signer_count: config.unique_signer_count,
            data_feed_ids: config.data_feed_ids.clone(),
            gateway_urls,
            authorized_signers,
            protocol,
        };

        self.transport.check(&request)?;

        Ok(Wrapper {
            config: config.clone(),
            request,
            contract: self.contract.clone(),
            transport: self.transport.clone(),
            call_timeout: self.call_timeout,
        })
    }
}

/// A callable bound to exactly one [`FeedConfig`], living for a single request
pub struct Wrapper {
    config: FeedConfig,
    request: PayloadRequest,
    contract: Arc<dyn PriceFeedContract>,
    transport: Arc<dyn AttestationTransport>,
    call_timeout: Duration,
}

impl Wrapper {
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn request(&self) -> &PayloadRequest {
        &self.request
    }

    pub fn protocol(&self) -> Protocol {
        self.request.protocol
    }

    /// Fetches a fresh payload and reads one field with it
    pub async fn read_field(&self, field: FieldId) -> Result<U256, TransportError> {
        self.bounded(async {
            let payload = self.transport.fetch_payload(&self.request).await?;
            self.contract.get_price(field, &payload).await
        })
        .await
    }

    /// Fetches a fresh payload and reads the `(eth, btc)` tuple with it
    pub async fn get_multiple_prices(&self) -> Result<(U256, U256), TransportError> {
        self.bounded(async {
            let payload = self.transport.fetch_payload(&self.request).await?;
            self.contract.get_multiple_prices(&payload).await
        })
        .await
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, TransportError>>,
    ) -> Result<T, TransportError> {
        tokio::time::timeout(self.call_timeout, fut)
            .await
            .map_err(|_| TransportError::Timeout(self.call_timeout))?
    }
}

impl std::fmt::Debug for Wrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wrapper")
            .field("config", &self.config)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}
