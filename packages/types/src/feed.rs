use std::{fmt, str::FromStr};

use alloy_primitives::Address;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Prices are reported on-chain as integers with this many implied decimals
pub const PRICE_DECIMALS: u32 = 8;

/// A logical price field, identified by its data-feed symbol
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema)]
pub enum FieldId {
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "BTC")]
    Btc,
}

impl FieldId {
    pub const ALL: [FieldId; 2] = [FieldId::Eth, FieldId::Btc];

    /// The data-feed / data-package id this field is attested under
    pub fn data_feed_id(&self) -> &'static str {
        match self {
            FieldId::Eth => "ETH",
            FieldId::Btc => "BTC",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data_feed_id())
    }
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[error("unknown data feed: {0}")]
pub struct UnknownFieldError(pub String);

impl FromStr for FieldId {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ETH" => Ok(FieldId::Eth),
            "BTC" => Ok(FieldId::Btc),
            _ => Err(UnknownFieldError(s.to_string())),
        }
    }
}

// any casing is accepted, so `ORACLE_DATA_FEEDS=eth,btc` works the same as the file
impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The two wire shapes an attestation wrapper can be built with
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    /// data-service id + signer count + data-feed ids (+ optional gateways)
    Modern,
    /// explicit data-package ids + authorized signer list + signer count
    Legacy,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Modern => f.write_str("modern"),
            Protocol::Legacy => f.write_str("legacy"),
        }
    }
}

/// Describes how to build one attestation wrapper.
///
/// A config with `explicit_signers` set is a legacy config, in which case an empty
/// `service_id` means the data-service id is omitted from the request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct FeedConfig {
    pub service_id: String,
    pub unique_signer_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_urls: Option<Vec<String>>,
    pub data_feed_ids: Vec<FieldId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<String>>)]
    pub explicit_signers: Option<Vec<Address>>,
}

impl FeedConfig {
    pub fn modern(
        service_id: impl Into<String>,
        unique_signer_count: u32,
        data_feed_ids: Vec<FieldId>,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            unique_signer_count,
            gateway_urls: None,
            data_feed_ids,
            explicit_signers: None,
        }
    }

    pub fn legacy(
        service_id: impl Into<String>,
        unique_signer_count: u32,
        data_feed_ids: Vec<FieldId>,
        signers: Vec<Address>,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            unique_signer_count,
            gateway_urls: None,
            data_feed_ids,
            explicit_signers: Some(signers),
        }
    }

    pub fn with_gateways(mut self, urls: Vec<String>) -> Self {
        self.gateway_urls = Some(urls);
        self
    }

    pub fn protocol(&self) -> Protocol {
        if self.explicit_signers.is_some() {
            Protocol::Legacy
        } else {
            Protocol::Modern
        }
    }
}

impl fmt::Display for FeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let service_id = if self.service_id.is_empty() {
            "<omitted>"
        } else {
            self.service_id.as_str()
        };
        write!(
            f,
            "{} service={} signers={} gateways={}",
            self.protocol(),
            service_id,
            self.unique_signer_count,
            self.gateway_urls.as_ref().map(|urls| urls.len()).unwrap_or(0)
        )
    }
}

/// One entry of the configured strategy list, before it is expanded into a [`FeedConfig`]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct StrategyEntry {
    pub service_id: String,
    #[serde(default)]
    pub with_gateways: bool,
}

impl StrategyEntry {
    pub fn new(service_id: impl Into<String>, with_gateways: bool) -> Self {
        Self {
            service_id: service_id.into(),
            with_gateways,
        }
    }
}
