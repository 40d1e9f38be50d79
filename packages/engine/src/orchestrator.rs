use alloy_primitives::U256;
use futures::future::{join_all, BoxFuture, FutureExt};
use oracle_types::{FieldId, Protocol};
use tracing::instrument;

use crate::{
    apis::SignerDiscovery,
    error::{ErrorKind, FallbackError, FieldUnavailable, TransportError},
    normalize::{normalize, RetrievalResult},
    strategy::LegacyStrategy,
    wrapper::{Wrapper, WrapperBuilder},
};

/// A raw value together with the protocol of the wrapper that produced it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Served {
    pub raw: U256,
    pub via: Protocol,
}

/// The end state of one field within one request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldOutcome {
    pub field: FieldId,
    pub result: Result<Served, FieldUnavailable>,
}

impl FieldOutcome {
    pub fn success(field: FieldId, raw: U256, via: Protocol) -> Self {
        Self {
            field,
            result: Ok(Served { raw, via }),
        }
    }

    pub fn unavailable(error: FieldUnavailable) -> Self {
        Self {
            field: error.field,
            result: Err(error),
        }
    }

    pub fn raw(&self) -> Option<U256> {
        self.result.as_ref().ok().map(|served| served.raw)
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.result
            .as_ref()
            .err()
            .map(|_| ErrorKind::FieldUnavailable)
    }
}

/// Drives the per-field primary then legacy sequence for one request
pub struct Orchestrator<'a> {
    builder: &'a WrapperBuilder,
    legacy: &'a LegacyStrategy,
    discovery: &'a dyn SignerDiscovery,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        builder: &'a WrapperBuilder,
        legacy: &'a LegacyStrategy,
        discovery: &'a dyn SignerDiscovery,
    ) -> Self {
        Self {
            builder,
            legacy,
            discovery,
        }
    }

    pub async fn retrieve(&self, primary: &Wrapper, fields: &[FieldId]) -> RetrievalResult {
        normalize(&self.outcomes(primary, fields).await)
    }

    /// Fields run concurrently, outcomes come back in the order they were requested
    pub async fn outcomes(&self, primary: &Wrapper, fields: &[FieldId]) -> Vec<FieldOutcome> {
        join_all(fields.iter().map(|field| self.retrieve_field(primary, *field))).await
    }

    #[instrument(level = "debug", skip(self, primary), fields(subsys = "Orchestrator"))]
    pub async fn retrieve_field(&self, primary: &Wrapper, field: FieldId) -> FieldOutcome {
        match self
            .with_fallback(primary, |wrapper| wrapper.read_field(field).boxed())
            .await
        {
            Ok((raw, via)) => FieldOutcome::success(field, raw, via),
            Err((primary, fallback)) => {
                let error = FieldUnavailable {
                    field,
                    primary,
                    fallback,
                };
                tracing::warn!("Field unavailable: {}", error);
                FieldOutcome::unavailable(error)
            }
        }
    }

    /// The tuple read, under the same two-attempt bound as a single field.
    /// Both fields share its outcome.
    #[instrument(level = "debug", skip(self, primary), fields(subsys = "Orchestrator"))]
    pub async fn retrieve_multiple(&self, primary: &Wrapper) -> Vec<FieldOutcome> {
        match self
            .with_fallback(primary, |wrapper| wrapper.get_multiple_prices().boxed())
            .await
        {
            Ok(((eth, btc), via)) => vec![
                FieldOutcome::success(FieldId::Eth, eth, via),
                FieldOutcome::success(FieldId::Btc, btc, via),
            ],
            Err((primary, fallback)) => {
                tracing::warn!("getMultiplePrices unavailable: {}; {}", primary, fallback);
                FieldId::ALL
                    .iter()
                    .map(|field| {
                        FieldOutcome::unavailable(FieldUnavailable {
                            field: *field,
                            primary: primary.clone(),
                            fallback: fallback.clone(),
                        })
                    })
                    .collect()
            }
        }
    }

    // exactly one primary attempt, then at most one legacy attempt
    async fn with_fallback<T, F>(
        &self,
        primary: &Wrapper,
        call: F,
    ) -> Result<(T, Protocol), (TransportError, FallbackError)>
    where
        F: for<'w> Fn(&'w Wrapper) -> BoxFuture<'w, Result<T, TransportError>>,
    {
        let primary_err = match call(primary).await {
            Ok(value) => return Ok((value, primary.protocol())),
            Err(err) => err,
        };

        tracing::warn!(
            "Primary [{}] failed, falling back to legacy: {}",
            primary.config(),
            primary_err
        );

        let legacy = match self.legacy.build(self.builder, self.discovery).await {
            Ok(legacy) => legacy,
            Err(err) => return Err((primary_err, err)),
        };

        match call(&legacy).await {
            Ok(value) => {
                tracing::info!("Legacy fallback succeeded");
                Ok((value, legacy.protocol()))
            }
            Err(err) => Err((primary_err, FallbackError::Call(err))),
        }
    }
}
