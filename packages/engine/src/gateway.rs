use async_trait::async_trait;
use oracle_types::Protocol;
use tracing::instrument;
use url::Url;

use crate::{
    apis::{AttestationTransport, AttestedPayload, PayloadRequest},
    error::{ConfigError, TransportError},
};

/// Fetches hex-encoded signed payloads over HTTP, trying gateways in order
#[derive(Clone, Debug)]
pub struct GatewayTransport {
    client: reqwest::Client,
    /// Used whenever a request does not carry its own gateway list
    default_gateways: Vec<Url>,
}

impl GatewayTransport {
    pub const PAYLOAD_PATH: &'static str = "data-packages/payload";

    pub fn new(client: reqwest::Client, default_gateways: Vec<Url>) -> Self {
        Self {
            client,
            default_gateways,
        }
    }

    fn gateways<'a>(&'a self, request: &'a PayloadRequest) -> &'a [Url] {
        if request.gateway_urls.is_empty() {
            &self.default_gateways
        } else {
            &request.gateway_urls
        }
    }

    /// The payload url for one gateway
    pub fn payload_url(gateway: &Url, request: &PayloadRequest) -> Result<Url, TransportError> {
        let mut url = gateway
            .join(Self::PAYLOAD_PATH)
            .map_err(|e| TransportError::Payload(format!("{gateway}: {e}")))?;

        let feeds = request
            .data_feed_ids
            .iter()
            .map(|id| id.data_feed_id())
            .collect::<Vec<_>>()
            .join(",");

        {
            let mut query = url.query_pairs_mut();
            if let Some(service_id) = &request.service_id {
                query.append_pair("data-service-id", service_id);
            }
            query
                .append_pair(
                    "unique-signers-count",
                    &request.unique_signer_count.to_string(),
                )
                .append_pair("data-packages-ids", &feeds);
            // legacy payloads are only signed by the explicitly authorized set
            if request.protocol == Protocol::Legacy {
                let signers = request
                    .authorized_signers
                    .iter()
                    .map(|signer| signer.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                query.append_pair("authorized-signers", &signers);
            }
            query.append_pair("format", "hex");
        }

        Ok(url)
    }

    async fn fetch_from(
        &self,
        gateway: &Url,
        request: &PayloadRequest,
    ) -> Result<Vec<u8>, TransportError> {
        let url = Self::payload_url(gateway, request)?;

        let body = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| TransportError::Payload(format!("{gateway}: {e}")))?
            .text()
            .await
            .map_err(|e| TransportError::Payload(format!("{gateway}: {e}")))?;

        let bytes = const_hex::decode(body.trim())
            .map_err(|e| TransportError::Payload(format!("{gateway}: invalid hex: {e}")))?;

        if bytes.is_empty() {
            return Err(TransportError::Payload(format!("{gateway}: empty payload")));
        }

        Ok(bytes)
    }
}

#[async_trait]
impl AttestationTransport for GatewayTransport {
    fn check(&self, request: &PayloadRequest) -> Result<(), ConfigError> {
        for url in &request.gateway_urls {
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::Rejected(format!(
                    "gateway {url} is not http(s)"
                )));
            }
        }

        if self.gateways(request).is_empty() {
            return Err(ConfigError::Rejected("no gateways available".to_string()));
        }

        Ok(())
    }

    #[instrument(level = "debug", skip(self, request), fields(subsys = "GatewayTransport", protocol = %request.protocol))]
    async fn fetch_payload(
        &self,
        request: &PayloadRequest,
    ) -> Result<AttestedPayload, TransportError> {
        let mut errors = Vec::new();

        for gateway in self.gateways(request) {
            match self.fetch_from(gateway, request).await {
                Ok(bytes) => {
                    return Ok(AttestedPayload {
                        protocol: request.protocol,
                        bytes,
                    })
                }
                Err(err) => {
                    tracing::debug!("{}", err);
                    errors.push(err.to_string());
                }
            }
        }

        Err(TransportError::Payload(errors.join("; ")))
    }
}
