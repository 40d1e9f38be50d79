use std::{fmt, time::Duration};

use oracle_types::FieldId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A [`oracle_types::FeedConfig`] could not be turned into a wrapper.
///
/// Always recoverable: the caller moves on to the next configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid data service id {0:?}: {1}")]
    ServiceId(String, String),

    #[error("unique signer count must be at least 1")]
    SignerCount,

    #[error("no data feeds requested")]
    NoDataFeeds,

    #[error("invalid gateway url {0:?}: {1}")]
    GatewayUrl(String, String),

    #[error("legacy config requires at least one authorized signer")]
    NoAuthorizedSigners,

    #[error("rejected by attestation transport: {0}")]
    Rejected(String),
}

/// A call through a constructed wrapper failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("payload fetch: {0}")]
    Payload(String),

    #[error("contract call: {0}")]
    Contract(String),

    #[error("signer discovery: {0}")]
    SignerDiscovery(String),
}

/// Why the one-shot legacy fallback for a field did not produce a value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FallbackError {
    #[error("signer discovery failed: {0}")]
    SignerDiscovery(TransportError),

    #[error("legacy wrapper construction failed: {0}")]
    Build(ConfigError),

    #[error("{0}")]
    Call(TransportError),
}

/// Both the primary and the legacy attempt failed for one field.
///
/// Recorded per field, never fatal to the request on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: primary -> {primary}; legacy -> {fallback}")]
pub struct FieldUnavailable {
    pub field: FieldId,
    pub primary: TransportError,
    pub fallback: FallbackError,
}

/// One static strategy that failed to construct, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFailure {
    pub strategy: String,
    pub error: ConfigError,
}

impl fmt::Display for StrategyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.strategy, self.error)
    }
}

/// The two errors that surface to the caller.
///
/// Both carry the diagnostics of every attempt that was made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("NoWrapperAvailable: {}", join_messages(.0))]
    NoWrapperAvailable(Vec<StrategyFailure>),

    #[error("AllFieldsUnavailable: {}", join_messages(.0))]
    AllFieldsUnavailable(Vec<FieldUnavailable>),
}

impl RetrievalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RetrievalError::NoWrapperAvailable(_) => ErrorKind::NoWrapperAvailable,
            RetrievalError::AllFieldsUnavailable(_) => ErrorKind::AllFieldsUnavailable,
        }
    }
}

fn join_messages<T: fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        return "no attempts were made".to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Closed classification of every error the engine can produce
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ConfigError,
    TransportError,
    FieldUnavailable,
    NoWrapperAvailable,
    AllFieldsUnavailable,
}

impl ErrorKind {
    /// Whether this kind ends the request with a hard error
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ErrorKind::NoWrapperAvailable | ErrorKind::AllFieldsUnavailable
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
